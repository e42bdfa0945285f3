//! Metadata record representing one work resolved from a metadata provider.

use serde::{Deserialize, Serialize};

/// Placeholder rendered for any absent field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder rendered for an absent publication year.
pub const NO_DATE: &str = "n.d.";

/// A single contributor as reported by the metadata provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Given name(s), possibly empty
    pub given: String,

    /// Family name, possibly empty
    pub family: String,
}

impl Author {
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            family: family.into(),
        }
    }

    /// Whether both name parts carry something printable
    pub fn is_complete(&self) -> bool {
        !self.given.trim().is_empty() && !self.family.trim().is_empty()
    }
}

/// Bibliographic facts for one work
///
/// The builder stores empty or whitespace-only values as `None`. Fields set
/// directly or deserialized may still hold them, so renderers go through the
/// accessors below, which treat a blank value the same as an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Contributors in publication order
    pub authors: Vec<Author>,

    /// Year of print publication
    pub year: Option<i32>,

    /// Title as supplied by the caller
    pub title: String,

    /// Journal or container name
    pub journal: Option<String>,

    pub volume: Option<String>,

    pub issue: Option<String>,

    /// Page range
    pub pages: Option<String>,

    /// Digital Object Identifier, without resolver prefix
    pub doi: Option<String>,
}

impl MetadataRecord {
    /// Create a record carrying only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            authors: Vec::new(),
            year: None,
            title: title.into(),
            journal: None,
            volume: None,
            issue: None,
            pages: None,
            doi: None,
        }
    }

    /// Year as rendered in a citation
    pub fn year_display(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| NO_DATE.to_string())
    }

    /// Journal name, if it carries anything printable
    pub fn journal(&self) -> Option<&str> {
        present(&self.journal)
    }

    pub fn volume(&self) -> Option<&str> {
        present(&self.volume)
    }

    pub fn issue(&self) -> Option<&str> {
        present(&self.issue)
    }

    pub fn pages(&self) -> Option<&str> {
        present(&self.pages)
    }

    pub fn doi(&self) -> Option<&str> {
        present(&self.doi)
    }

    pub fn journal_display(&self) -> &str {
        self.journal().unwrap_or(NOT_AVAILABLE)
    }

    pub fn volume_display(&self) -> &str {
        self.volume().unwrap_or(NOT_AVAILABLE)
    }

    pub fn issue_display(&self) -> &str {
        self.issue().unwrap_or(NOT_AVAILABLE)
    }

    pub fn pages_display(&self) -> &str {
        self.pages().unwrap_or(NOT_AVAILABLE)
    }

    pub fn doi_display(&self) -> &str {
        self.doi().unwrap_or(NOT_AVAILABLE)
    }
}

/// A field value that is neither absent nor blank
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Drop empty values so they can only ever render as a placeholder
fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Builder for constructing MetadataRecord objects
#[derive(Debug, Clone)]
pub struct MetadataRecordBuilder {
    record: MetadataRecord,
}

impl MetadataRecordBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            record: MetadataRecord::new(title),
        }
    }

    /// Append one author
    pub fn author(mut self, given: impl Into<String>, family: impl Into<String>) -> Self {
        self.record.authors.push(Author::new(given, family));
        self
    }

    /// Replace the author list
    pub fn authors(mut self, authors: Vec<Author>) -> Self {
        self.record.authors = authors;
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.record.year = Some(year);
        self
    }

    pub fn maybe_year(mut self, year: Option<i32>) -> Self {
        self.record.year = year;
        self
    }

    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.record.journal = non_blank(journal);
        self
    }

    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.record.volume = non_blank(volume);
        self
    }

    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        self.record.issue = non_blank(issue);
        self
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.record.pages = non_blank(pages);
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.record.doi = non_blank(doi);
        self
    }

    /// Build the MetadataRecord
    pub fn build(self) -> MetadataRecord {
        self.record
    }
}
