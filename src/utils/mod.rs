//! Utility modules supporting reference formatting.
//!
//! - [`format_authors`]: APA author list from `{given, family}` pairs
//! - [`compose`] / [`compose_reference`]: full citation as styled runs
//! - [`format_reference`]: plain-text citation, or the lookup failure message
//! - [`HttpClient`]: HTTP client with a fixed per-request timeout
//!
//! # Formatting
//!
//! ```rust
//! use reference_format::models::MetadataRecordBuilder;
//! use reference_format::utils::{format_reference, AuthorStyle};
//!
//! let record = MetadataRecordBuilder::new("Study X")
//!     .author("Ann", "Lee")
//!     .year(2020)
//!     .journal("J. of Things")
//!     .volume("5")
//!     .issue("2")
//!     .pages("10-20")
//!     .doi("10.1/abc")
//!     .build();
//!
//! assert_eq!(
//!     format_reference(&Ok(record), AuthorStyle::Apa),
//!     "Lee, A. (2020). Study X. *J. of Things*, 5(2), 10-20. https://doi.org/10.1/abc"
//! );
//! ```

mod cite;
mod http;

pub use cite::{
    compose, compose_reference, format_author, format_authors, format_initials,
    format_reference, AuthorStyle,
};
pub use http::{default_user_agent, HttpClient};
