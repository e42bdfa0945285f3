//! # Reference Format
//!
//! Look up publication titles on CrossRef and render APA 7th edition
//! references into CSV files or Word documents.
//!
//! ## Architecture
//!
//! - [`models`]: Metadata records, lookup failures and composed citations
//! - [`utils`]: APA formatting rules and the HTTP client
//! - [`sources`]: Metadata providers behind the [`MetadataSource`] trait
//! - [`export`]: CSV input/output and `.docx` generation
//! - [`batch`]: Sequential driver tying lookup, formatting and export together
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal progress and status output

pub mod batch;
pub mod config;
pub mod export;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Citation, LookupFailure, LookupResult, MetadataRecord, Reference};
pub use sources::{CrossRefSource, MetadataSource};
pub use utils::{format_reference, AuthorStyle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
