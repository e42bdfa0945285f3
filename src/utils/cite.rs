//! APA 7th edition citation formatting.
//!
//! Everything here is pure: a [`MetadataRecord`] (or the failure that replaced
//! it) goes in, a string or a [`Citation`] comes out.

use crate::models::{Author, Citation, LookupResult, MetadataRecord, Reference, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};
use std::fmt;

const DOI_RESOLVER: &str = "https://doi.org/";

/// How formatted author names are joined into one list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorStyle {
    /// `A & B`, `A, B, & C`
    #[default]
    Apa,
    /// `A, B, C` regardless of count
    Flat,
}

impl fmt::Display for AuthorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorStyle::Apa => write!(f, "apa"),
            AuthorStyle::Flat => write!(f, "flat"),
        }
    }
}

/// Initials for a given name: "John Michael" becomes "J. M."
pub fn format_initials(given: &str) -> String {
    given
        .split_whitespace()
        .filter_map(|name| name.chars().next())
        .map(|initial| format!("{}.", initial))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format one author as "Family, I. I.", or `None` if a name part is missing
pub fn format_author(author: &Author) -> Option<String> {
    if !author.is_complete() {
        return None;
    }
    Some(format!(
        "{}, {}",
        author.family.trim(),
        format_initials(&author.given)
    ))
}

/// Format the author list of a record
pub fn format_authors(authors: &[Author], style: AuthorStyle) -> String {
    let names: Vec<String> = authors.iter().filter_map(format_author).collect();

    match (style, names.as_slice()) {
        (_, []) => NOT_AVAILABLE.to_string(),
        (_, [only]) => only.clone(),
        (AuthorStyle::Flat, names) => names.join(", "),
        (AuthorStyle::Apa, [first, second]) => format!("{} & {}", first, second),
        (AuthorStyle::Apa, [rest @ .., last]) => format!("{}, & {}", rest.join(", "), last),
    }
}

/// Compose the styled runs of a citation for a resolved record
pub fn compose(record: &MetadataRecord, style: AuthorStyle) -> Citation {
    let authors = format_authors(&record.authors, style);

    let issue = match record.issue() {
        Some(issue) => format!("({})", issue),
        None => String::new(),
    };
    let doi = match record.doi() {
        Some(doi) => format!("{}{}", DOI_RESOLVER, doi),
        None => NOT_AVAILABLE.to_string(),
    };

    Citation {
        lead: format!("{} ({}). {}. ", authors, record.year_display(), record.title),
        journal: record.journal_display().to_string(),
        tail: format!(
            ", {}{}, {}. {}",
            record.volume_display(),
            issue,
            record.pages_display(),
            doi
        ),
    }
}

/// Compose a reference from a lookup outcome
///
/// A failed lookup is passed through as-is; no template is applied to it.
pub fn compose_reference(result: &LookupResult, style: AuthorStyle) -> Reference {
    match result {
        Ok(record) => Reference::Citation(compose(record, style)),
        Err(failure) => Reference::Failure(failure.clone()),
    }
}

/// Plain-text reference for a lookup outcome, suitable for a single CSV cell
pub fn format_reference(result: &LookupResult, style: AuthorStyle) -> String {
    compose_reference(result, style).to_string()
}
