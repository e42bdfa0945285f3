//! Metadata source plugins.
//!
//! A [`MetadataSource`] turns a publication title into a [`MetadataRecord`].
//! CrossRef is the only network-backed source; [`MockSource`] serves tests and
//! offline runs.
//!
//! Lookups are best-effort: one request per title, first candidate only, no
//! retry. Any error is folded into a [`LookupFailure`] by
//! [`MetadataSource::resolve`], so callers always get a value they can render.

mod crossref;
pub mod mock;

pub use crossref::{CrossRefSource, CROSSREF_API_BASE};
pub use mock::MockSource;

use crate::models::{LookupFailure, LookupResult, MetadataRecord};
use async_trait::async_trait;

/// Interface for anything that can resolve a title to bibliographic metadata.
#[async_trait]
pub trait MetadataSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "crossref")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Look up the best match for a title
    async fn lookup_title(&self, title: &str) -> Result<MetadataRecord, SourceError>;

    /// Look up a title and fold every error into a [`LookupFailure`]
    async fn resolve(&self, title: &str) -> LookupResult {
        if title.trim().is_empty() {
            return Err(LookupFailure::no_data());
        }

        self.lookup_title(title).await.map_err(|e| {
            tracing::warn!("{} lookup failed for {:?}: {}", self.id(), title, e);
            LookupFailure::from(e)
        })
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// No candidate for the requested title
    #[error("No data found for this title.")]
    NotFound,

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<SourceError> for LookupFailure {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound => LookupFailure::no_data(),
            other => LookupFailure::new(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_DATA_FOUND;

    #[test]
    fn test_not_found_becomes_no_data() {
        let failure = LookupFailure::from(SourceError::NotFound);
        assert_eq!(failure.message, NO_DATA_FOUND);
    }

    #[test]
    fn test_other_errors_keep_their_text() {
        let failure = LookupFailure::from(SourceError::Api("status 503".to_string()));
        assert_eq!(failure.message, "API error: status 503");
    }

    #[tokio::test]
    async fn test_empty_title_skips_lookup() {
        let source = MockSource::new();
        let result = source.resolve("   ").await;
        assert_eq!(result, Err(LookupFailure::no_data()));
        assert_eq!(source.calls(), 0);
    }
}
