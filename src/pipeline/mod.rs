//! Search-to-playlist import pipeline

mod range;
mod selector;


pub use range::{EpisodeRange, ValidationError, validate_choice};
pub use selector::{Answer, Selector};

use crate::{
    collector::{CollectorClient, CollectorError, SearchResult},
    manifest::{ImportItem, PlaySourceGroup},
    sync::{SyncError, SyncServer},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many times an invalid answer is asked again before giving up
pub const MAX_INPUT_ATTEMPTS: usize = 3;

/// Pipeline failures; clean endings are `PipelineOutcome`s
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Search failed: {0}")]
    SearchFailed(#[source] CollectorError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl PipelineError {
    /// Process exit code for this failure
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::SearchFailed(_) => 4,
            Self::Sync(_) => 5,
        }
    }
}

/// How a pipeline run ended without failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Imported { count: usize },
    NoResults,
    NoPlayableAddress,
    Cancelled,
}

impl PipelineOutcome {
    /// Process exit code for this outcome
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Imported { .. } | Self::NoResults | Self::Cancelled => 0,
            Self::NoPlayableAddress => 3,
        }
    }
}

/// Pipeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Searching,
    NoResults,
    ResultsReady,
    DetailFetch,
    SourceSelected,
    RangeSelected,
    Authenticated,
    Submitted,
}

/// How to authenticate against the SyncTV server
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Reuse a token from an earlier login
    Token(String),
    Password { username: String, password: String },
}

/// Where imported episodes go
#[derive(Debug, Clone)]
pub struct SyncTarget {
    pub room_id: String,
    pub credentials: Credentials,
    /// Empty the room playlist before pushing
    pub clear_before: bool,
}

/// Token for `credentials`, logging in unless one is supplied
pub async fn authenticate(
    sync: &dyn SyncServer,
    credentials: &Credentials,
) -> Result<String, SyncError> {
    match credentials {
        Credentials::Token(token) => {
            debug!("Reusing configured token");
            Ok(token.clone())
        }
        Credentials::Password { username, password } => sync.login(username, password).await,
    }
}

/// Optionally clear the room, then push `items` as one batch
pub async fn push_items(
    sync: &dyn SyncServer,
    token: &str,
    target: &SyncTarget,
    items: &[ImportItem],
) -> Result<usize, SyncError> {
    if target.clear_before {
        sync.clear_playlist(token, &target.room_id).await?;
    }

    sync.push_movies(token, &target.room_id, items).await
}

/// Authenticate, then clear and push `items`
pub async fn submit_items(
    sync: &dyn SyncServer,
    target: &SyncTarget,
    items: &[ImportItem],
) -> Result<usize, SyncError> {
    let token = authenticate(sync, &target.credentials).await?;
    push_items(sync, &token, target, items).await
}

/// Sequential search, select and import of one title
pub struct ImportPipeline {
    collector: CollectorClient,
    sync: Arc<dyn SyncServer>,
    state: PipelineState,
}

impl ImportPipeline {
    pub fn new(collector: CollectorClient, sync: Arc<dyn SyncServer>) -> Self {
        Self {
            collector,
            sync,
            state: PipelineState::Idle,
        }
    }

    pub const fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, state: PipelineState) {
        debug!("Pipeline {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Run the whole import for `keyword`
    pub async fn run(
        &mut self,
        keyword: &str,
        target: &SyncTarget,
        selector: &mut dyn Selector,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.transition(PipelineState::Searching);
        let results = self
            .collector
            .search(keyword)
            .await
            .map_err(PipelineError::SearchFailed)?;

        if results.is_empty() {
            info!("No results for {:?}", keyword);
            self.transition(PipelineState::NoResults);
            return Ok(PipelineOutcome::NoResults);
        }
        self.transition(PipelineState::ResultsReady);

        let Some(index) = ask_choice(selector, results.len(), |s| s.choose_result(&results))?
        else {
            return Ok(PipelineOutcome::Cancelled);
        };
        let Some(chosen) = self.with_manifest(&results[index]).await else {
            return Ok(PipelineOutcome::NoPlayableAddress);
        };

        let groups: Vec<PlaySourceGroup> = chosen
            .play_sources()
            .into_iter()
            .filter(|g| !g.is_empty())
            .collect();
        if groups.is_empty() {
            warn!("{} has a manifest without episodes", chosen.name());
            return Ok(PipelineOutcome::NoPlayableAddress);
        }
        selector.show_detail(&chosen, &groups);

        let group = if groups.len() == 1 {
            &groups[0]
        } else {
            let Some(index) = ask_choice(selector, groups.len(), |s| s.choose_source(&groups))?
            else {
                return Ok(PipelineOutcome::Cancelled);
            };
            &groups[index]
        };
        self.transition(PipelineState::SourceSelected);

        let Some(items) = ask_range(selector, group)? else {
            return Ok(PipelineOutcome::Cancelled);
        };
        self.transition(PipelineState::RangeSelected);

        if !selector.confirm(&items) {
            return Ok(PipelineOutcome::Cancelled);
        }

        let count = self.submit(target, &items).await?;
        Ok(PipelineOutcome::Imported { count })
    }

    /// Return the result itself when it carries a manifest, otherwise its
    /// detail record when that one does
    async fn with_manifest(&mut self, result: &SearchResult) -> Option<SearchResult> {
        if result.has_manifest() {
            return Some(result.clone());
        }

        self.transition(PipelineState::DetailFetch);
        let Some(id) = result.id() else {
            warn!("{} has no id, cannot fetch detail", result.name());
            return None;
        };

        let detail = self.collector.detail(id).await?;
        if detail.has_manifest() {
            Some(detail)
        } else {
            warn!("No playable address for {}", result.name());
            None
        }
    }

    async fn submit(
        &mut self,
        target: &SyncTarget,
        items: &[ImportItem],
    ) -> Result<usize, PipelineError> {
        let token = authenticate(self.sync.as_ref(), &target.credentials).await?;
        self.transition(PipelineState::Authenticated);

        let count = push_items(self.sync.as_ref(), &token, target, items).await?;
        self.transition(PipelineState::Submitted);

        Ok(count)
    }
}

/// Ask until the answer is accepted or `MAX_INPUT_ATTEMPTS` answers were
/// rejected, in which case the last rejection is returned
fn ask_until_valid<T>(
    selector: &mut dyn Selector,
    mut ask: impl FnMut(&mut dyn Selector) -> Answer<T>,
) -> Answer<T> {
    let mut attempt = 1;
    loop {
        match ask(&mut *selector) {
            Err(e) if attempt < MAX_INPUT_ATTEMPTS => selector.report_invalid(&e),
            answer => return answer,
        }
        attempt += 1;
    }
}

/// Ask for a 1-based choice among `max` entries, returning the 0-based index
fn ask_choice(
    selector: &mut dyn Selector,
    max: usize,
    mut ask: impl FnMut(&mut dyn Selector) -> Answer<usize>,
) -> Answer<usize> {
    ask_until_valid(selector, |s| {
        ask(s)?.map(|choice| validate_choice(choice, max)).transpose()
    })
}

/// Ask for an episode range that fits `group`
fn ask_range(selector: &mut dyn Selector, group: &PlaySourceGroup) -> Answer<Vec<ImportItem>> {
    let slice = ask_until_valid(selector, |s| {
        s.choose_range(group)?
            .map(|range| range.to_slice(group.len()))
            .transpose()
    })?;

    Ok(slice.map(|slice| group.episodes[slice].iter().map(ImportItem::from).collect()))
}
