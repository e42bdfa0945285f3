//! CSV input and output.

use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;

use super::ExportError;
use crate::models::Reference;

/// An input table together with the position of its title column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    title_index: usize,
}

impl TitleTable {
    /// Parse a table from any reader, requiring a column named `title_column`
    pub fn from_reader<R: Read>(reader: R, title_column: &str) -> Result<Self, ExportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let title_index = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == title_column)
            .ok_or_else(|| ExportError::MissingColumn(title_column.to_string()))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Self {
            headers,
            rows,
            title_index,
        })
    }

    /// Titles in input order; missing cells come back empty
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(self.title_index).map(String::as_str).unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read the title table from a CSV file
pub fn read_titles(path: &Path, title_column: &str) -> Result<TitleTable, ExportError> {
    let file = std::fs::File::open(path)?;
    TitleTable::from_reader(file, title_column)
}

/// Write the input table with one extra column holding the references
pub fn write_csv(
    table: &TitleTable,
    references: &[Reference],
    reference_column: &str,
    path: &Path,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv_to(table, references, reference_column, file)
}

pub(crate) fn write_csv_to<W: Write>(
    table: &TitleTable,
    references: &[Reference],
    reference_column: &str,
    writer: W,
) -> Result<(), ExportError> {
    if references.len() != table.len() {
        return Err(ExportError::RowMismatch {
            expected: table.len(),
            actual: references.len(),
        });
    }

    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut header = table.headers.clone();
    header.push(reference_column.to_string());
    writer.write_record(&header)?;

    for (row, reference) in table.rows.iter().zip(references) {
        let mut record = row.clone();
        record.push(reference.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
