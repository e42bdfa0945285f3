//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::MetadataRecord;
use crate::sources::{MetadataSource, SourceError};

/// A source that answers from an in-memory table of titles.
///
/// Titles without an entry resolve to [`SourceError::NotFound`]; titles
/// registered with [`MockSource::fail`] return an API error.
#[derive(Debug, Default)]
pub struct MockSource {
    records: Mutex<HashMap<String, MetadataRecord>>,
    failures: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a new, empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the record returned for its title.
    pub fn insert(&self, record: MetadataRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.title.clone(), record);
    }

    /// Make lookups for `title` fail with an API error carrying `message`.
    pub fn fail(&self, title: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(title.to_string(), message.to_string());
    }

    /// Number of lookups performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn lookup_title(&self, title: &str) -> Result<MetadataRecord, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failures.lock().unwrap().get(title).cloned() {
            return Err(SourceError::Api(message));
        }

        self.records
            .lock()
            .unwrap()
            .get(title)
            .cloned()
            .ok_or(SourceError::NotFound)
    }
}
