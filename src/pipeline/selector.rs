use super::{EpisodeRange, ValidationError};
use crate::{
    collector::SearchResult,
    manifest::{ImportItem, PlaySourceGroup},
};

/// One answer from the user: `Ok(None)` cancels, `Err` is input that could
/// not be read and will be asked again
pub type Answer<T> = Result<Option<T>, ValidationError>;

/// User decisions taken during an import
///
/// Choices are 1-based as shown to the user. Each call asks once; the
/// pipeline owns the retry budget.
pub trait Selector {
    /// Pick one of the search results
    fn choose_result(&mut self, results: &[SearchResult]) -> Answer<usize>;

    /// Called once the chosen title and its play sources are known
    fn show_detail(&mut self, _result: &SearchResult, _groups: &[PlaySourceGroup]) {}

    /// Pick a play source when the title has more than one
    fn choose_source(&mut self, groups: &[PlaySourceGroup]) -> Answer<usize>;

    /// Pick the episodes of `group` to import
    fn choose_range(&mut self, group: &PlaySourceGroup) -> Answer<EpisodeRange>;

    /// Last confirmation before anything is sent to the server
    fn confirm(&mut self, items: &[ImportItem]) -> bool;

    /// The previous answer was rejected and will be asked again
    fn report_invalid(&mut self, _error: &ValidationError) {}
}
