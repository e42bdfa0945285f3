//! Reading titles and writing formatted references.
//!
//! - [`read_titles`] / [`TitleTable`]: load an input CSV and locate the title column
//! - [`write_csv`]: copy the input table and append one reference per row
//! - [`write_docx`]: a Word document with one paragraph per reference, journal
//!   names in italics

mod csv;
mod docx;

pub use self::csv::{read_titles, write_csv, TitleTable};
pub use self::docx::{render_document_xml, write_docx, DOCUMENT_HEADING};

/// Errors raised while reading input or writing output files
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// The input table has no column with the expected name
    #[error("Input CSV must contain a '{0}' column.")]
    MissingColumn(String),

    /// The number of references does not match the number of input rows
    #[error("Expected {expected} references, got {actual}")]
    RowMismatch { expected: usize, actual: usize },

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(String),
}
