//! Core data models for metadata records and formatted references.

mod citation;
mod record;

pub use citation::{Citation, LookupFailure, LookupResult, Reference, NO_DATA_FOUND};
pub use record::{Author, MetadataRecord, MetadataRecordBuilder, NOT_AVAILABLE, NO_DATE};
