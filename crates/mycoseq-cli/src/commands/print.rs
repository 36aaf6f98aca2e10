//! `mycoseq print` command implementation
//!
//! Prints records of a multi-FASTA file selected by their 1-based position.

use crate::commands::load_fasta;
use crate::error::{CliError, Result};
use mycoseq_common::FastaRecord;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Positions to print, resolved against the number of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Sorted, de-duplicated positions, each reported on its own
    pub positions: Vec<usize>,

    /// Inclusive spans of range arguments lying past the last record
    pub overflow: Vec<(usize, usize)>,
}

/// Print the selected records to stdout
pub async fn run(fasta_file: &Path, positions: &[String]) -> Result<()> {
    let spans = parse_positions(positions)?;
    let records = load_fasta(fasta_file)?;
    let selection = select_positions(&spans, records.len());

    debug!(
        file = %fasta_file.display(),
        records = records.len(),
        selected = selection.positions.len(),
        overflow = selection.overflow.len(),
        "Printing sequences"
    );

    let stdout = io::stdout();
    let stderr = io::stderr();
    print_positions(&records, &selection, &mut stdout.lock(), &mut stderr.lock())
}

/// Parse position arguments into inclusive `(start, end)` spans
///
/// Each argument is a number (`3`) or an inclusive range (`5-7`).
pub fn parse_positions(args: &[String]) -> Result<Vec<(usize, usize)>> {
    args.iter()
        .map(|arg| {
            let arg = arg.trim();
            match arg.split_once('-') {
                Some((start, end)) => {
                    let start = parse_position(start, arg)?;
                    let end = parse_position(end, arg)?;
                    if start > end {
                        return Err(CliError::invalid_position(arg));
                    }
                    Ok((start, end))
                },
                None => {
                    let pos = parse_position(arg, arg)?;
                    Ok((pos, pos))
                },
            }
        })
        .collect()
}

fn parse_position(part: &str, arg: &str) -> Result<usize> {
    part.trim()
        .parse()
        .map_err(|_| CliError::invalid_position(arg))
}

/// Expand spans into positions, stopping at the record count
///
/// Whatever a range covers past `count` is kept as one overflow span, so a
/// huge range never expands. Overlapping overflow spans are merged.
pub fn select_positions(spans: &[(usize, usize)], count: usize) -> Selection {
    let first_missing = count.saturating_add(1);
    let mut positions = BTreeSet::new();
    let mut overflow: Vec<(usize, usize)> = Vec::new();

    for &(start, end) in spans {
        let last_in_range = end.min(count);
        if start <= last_in_range {
            positions.extend(start..=last_in_range);
        }

        let tail_start = start.max(first_missing);
        if tail_start == end {
            positions.insert(end);
        } else if tail_start < end {
            overflow.push((tail_start, end));
        }
    }

    overflow.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in overflow {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    positions.retain(|&pos| !merged.iter().any(|&(start, end)| (start..=end).contains(&pos)));

    Selection {
        positions: positions.into_iter().collect(),
        overflow: merged,
    }
}

/// Write the selected records to `out`; out-of-range positions are reported
/// on `err` and skipped
pub fn print_positions<W: Write, E: Write>(
    records: &[FastaRecord],
    selection: &Selection,
    out: &mut W,
    err: &mut E,
) -> Result<()> {
    let count = records.len();

    for &pos in &selection.positions {
        match pos.checked_sub(1).and_then(|idx| records.get(idx)) {
            Some(record) => writeln!(out, "{}", record)?,
            None => writeln!(
                err,
                "Position {} is out of range. There are only {} sequences.",
                pos, count
            )?,
        }
    }

    for &(start, end) in &selection.overflow {
        writeln!(
            err,
            "Positions {}-{} are out of range. There are only {} sequences.",
            start, end, count
        )?;
    }

    out.flush()?;
    Ok(())
}
