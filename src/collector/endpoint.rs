use super::{CollectorError, Result};

/// Collector API base URL with ordered fallbacks
///
/// The primary is always present; there is no way to mutate an endpoint once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    primary: String,
    backups: Vec<String>,
}

impl Endpoint {
    /// Create an endpoint without backups
    pub fn new(primary: impl Into<String>) -> Result<Self> {
        Self::with_backups(primary, Vec::<String>::new())
    }

    /// Create an endpoint with backup base URLs, tried in the given order
    pub fn with_backups<I, S>(primary: impl Into<String>, backups: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary = primary.into().trim().to_string();
        if primary.is_empty() {
            return Err(CollectorError::InvalidEndpoint(
                "primary URL is empty".to_string(),
            ));
        }

        let backups = backups
            .into_iter()
            .map(|b| b.into().trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();

        Ok(Self { primary, backups })
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn backups(&self) -> &[String] {
        &self.backups
    }

    /// Candidate base URLs, primary first
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.backups.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        1 + self.backups.len()
    }

    /// Always false, kept for symmetry with `len`
    pub const fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_order() {
        let endpoint =
            Endpoint::with_backups("https://a/api", ["https://b/api", " ", "https://c/api"])
                .unwrap();

        let candidates: Vec<&str> = endpoint.candidates().collect();
        assert_eq!(candidates, vec!["https://a/api", "https://b/api", "https://c/api"]);
        assert_eq!(endpoint.len(), 3);
    }

    #[test]
    fn test_empty_primary_rejected() {
        let result = Endpoint::new("  ");
        assert!(matches!(result, Err(CollectorError::InvalidEndpoint(_))));
    }
}
