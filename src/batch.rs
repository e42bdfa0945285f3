//! Sequential title-to-reference driver.
//!
//! Each title gets exactly one lookup, awaited before the next one starts, and
//! results keep the input order.

use std::path::Path;

use crate::export::{read_titles, write_csv, write_docx, ExportError, TitleTable};
use crate::models::Reference;
use crate::sources::MetadataSource;
use crate::utils::{compose_reference, AuthorStyle};

/// Summary of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn from_references(references: &[Reference]) -> Self {
        let resolved = references.iter().filter(|r| r.is_citation()).count();
        Self {
            total: references.len(),
            resolved,
            failed: references.len() - resolved,
        }
    }
}

/// Resolve and format titles one at a time
///
/// `on_progress` is called after each title with the number completed so far.
pub async fn resolve_titles<'a, I, F>(
    source: &dyn MetadataSource,
    titles: I,
    style: AuthorStyle,
    mut on_progress: F,
) -> Vec<Reference>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(usize, &str),
{
    let mut references = Vec::new();

    for title in titles {
        let result = source.resolve(title).await;
        references.push(compose_reference(&result, style));
        on_progress(references.len(), title);
    }

    let summary = BatchSummary::from_references(&references);
    tracing::info!(
        "Resolved {}/{} titles via {} ({} failed)",
        summary.resolved,
        summary.total,
        source.name(),
        summary.failed
    );

    references
}

/// Read titles from `input`, resolve them, and write a CSV to `output`
pub async fn process_titles_to_csv<F>(
    source: &dyn MetadataSource,
    input: &Path,
    output: &Path,
    title_column: &str,
    reference_column: &str,
    style: AuthorStyle,
    on_progress: F,
) -> Result<BatchSummary, ExportError>
where
    F: FnMut(usize, &str),
{
    let table = read_titles(input, title_column)?;
    tracing::debug!("Read {} titles from {}", table.len(), input.display());

    let references = resolve_table(source, &table, style, on_progress).await;
    write_csv(&table, &references, reference_column, output)?;

    Ok(BatchSummary::from_references(&references))
}

/// Read titles from `input`, resolve them, and write a Word document to `output`
pub async fn process_titles_to_docx<F>(
    source: &dyn MetadataSource,
    input: &Path,
    output: &Path,
    title_column: &str,
    style: AuthorStyle,
    on_progress: F,
) -> Result<BatchSummary, ExportError>
where
    F: FnMut(usize, &str),
{
    let table = read_titles(input, title_column)?;
    tracing::debug!("Read {} titles from {}", table.len(), input.display());

    let references = resolve_table(source, &table, style, on_progress).await;
    write_docx(&references, output)?;

    Ok(BatchSummary::from_references(&references))
}

async fn resolve_table<F>(
    source: &dyn MetadataSource,
    table: &TitleTable,
    style: AuthorStyle,
    on_progress: F,
) -> Vec<Reference>
where
    F: FnMut(usize, &str),
{
    resolve_titles(source, table.titles(), style, on_progress).await
}
