//! Lookup outcomes and the citations composed from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MetadataRecord;

/// Message used when the provider returns no candidate for a title
pub const NO_DATA_FOUND: &str = "No data found for this title.";

/// A metadata lookup that did not produce a record
///
/// The message is shown to the user in place of the citation, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    pub message: String,
}

impl LookupFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The provider had nothing matching the title
    pub fn no_data() -> Self {
        Self::new(NO_DATA_FOUND)
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LookupFailure {}

/// Outcome of resolving one title
pub type LookupResult = Result<MetadataRecord, LookupFailure>;

/// A citation split into styled runs
///
/// `lead` and `tail` are plain text; `journal` is the span rendered in italics
/// by rich-text sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// `{Author} ({Year}). {Title}. `
    pub lead: String,

    /// Journal name
    pub journal: String,

    /// `, {Volume}{Issue}, {Pages}. {DOI}`
    pub tail: String,
}

impl Citation {
    /// Plain-text rendering with asterisks marking the italic run
    pub fn to_plain(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}*{}", self.lead, self.journal, self.tail)
    }
}

/// What the composer produces for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reference {
    Citation(Citation),
    Failure(LookupFailure),
}

impl Reference {
    pub fn is_citation(&self) -> bool {
        matches!(self, Reference::Citation(_))
    }

    pub fn citation(&self) -> Option<&Citation> {
        match self {
            Reference::Citation(citation) => Some(citation),
            Reference::Failure(_) => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Citation(citation) => fmt::Display::fmt(citation, f),
            Reference::Failure(failure) => fmt::Display::fmt(failure, f),
        }
    }
}
