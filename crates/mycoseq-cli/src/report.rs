//! Tab-separated reports
//!
//! Metadata and lookup results are written as TSV with a header row taken
//! from the serialized field names.

use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// Write rows to a TSV file, replacing any existing file
///
/// Returns the number of rows written.
pub fn write_tsv<S: Serialize>(path: &Path, rows: &[S]) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Read the first column of a plain list file, one entry per line
///
/// Lines are trimmed and blank lines skipped.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
