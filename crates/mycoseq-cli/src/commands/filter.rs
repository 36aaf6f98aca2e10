//! `mycoseq filter` command implementation
//!
//! Drops records shorter than a minimum length.

use crate::commands::{ensure_parent_dir, load_fasta};
use crate::error::Result;
use colored::Colorize;
use mycoseq_common::fasta::write_fasta_file;
use mycoseq_common::FastaRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix appended to the input stem for the default output path
pub const FILTERED_SUFFIX: &str = "_length-filtered.fasta";

/// Filter a FASTA file by minimum sequence length
pub async fn run(fasta_file: &Path, min_length: usize, output: Option<&Path>) -> Result<()> {
    let records = load_fasta(fasta_file)?;
    let total = records.len();

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(fasta_file));

    let (kept, removed) = filter_by_length(records, min_length);

    ensure_parent_dir(&output_path)?;
    write_fasta_file(&output_path, &kept)?;

    info!(
        input = %fasta_file.display(),
        output = %output_path.display(),
        min_length = min_length,
        kept = kept.len(),
        removed = removed,
        "Filtered sequences by length"
    );

    println!("{:<17} {}", "Input file:", fasta_file.display());
    println!("{:<17} {}", "Output file:", output_path.display());
    println!("{:<17} {}", "Minimum length:", min_length);
    println!("{:<17} {}", "Total sequences:", total);
    println!("{:<17} {}", "Kept:", kept.len().to_string().green());
    println!("{:<17} {}", "Removed:", removed.to_string().yellow());

    Ok(())
}

/// Split records into those at least `min_length` long (in input order) and
/// a count of the rest
pub fn filter_by_length(records: Vec<FastaRecord>, min_length: usize) -> (Vec<FastaRecord>, usize) {
    let total = records.len();
    let kept: Vec<FastaRecord> = records
        .into_iter()
        .filter(|record| record.len() >= min_length)
        .collect();
    let removed = total - kept.len();
    (kept, removed)
}

/// `<dir>/<stem>_length-filtered.fasta` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.with_extension("");
    let mut name = stem.into_os_string();
    name.push(FILTERED_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mycoseq_common::fasta::read_fasta_file;
    use tempfile::TempDir;

    #[test]
    fn test_filter_by_length_keeps_order() {
        let records = vec![
            FastaRecord::new("a", "ACGTACGT"),
            FastaRecord::new("b", "ACG"),
            FastaRecord::new("c", "ACGTA"),
        ];

        let (kept, removed) = filter_by_length(records, 5);
        let headers: Vec<_> = kept.iter().map(|r| r.header.as_str()).collect();
        assert_eq!(headers, vec!["a", "c"]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_filter_by_length_zero_keeps_everything() {
        let records = vec![FastaRecord::new("empty", ""), FastaRecord::new("b", "A")];
        let (kept, removed) = filter_by_length(records, 0);
        assert_eq!(kept.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/seqs.fasta")),
            PathBuf::from("data/seqs_length-filtered.fasta")
        );
        assert_eq!(
            default_output_path(Path::new("seqs.aligned.fa")),
            PathBuf::from("seqs.aligned_length-filtered.fasta")
        );
        assert_eq!(
            default_output_path(Path::new("seqs")),
            PathBuf::from("seqs_length-filtered.fasta")
        );
    }

    #[tokio::test]
    async fn test_run_writes_default_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("its.fasta");
        std::fs::write(&input, ">long\nACGTACGTAC\n>short\nACG\n").unwrap();

        run(&input, 5, None).await.unwrap();

        let output = dir.path().join("its_length-filtered.fasta");
        let records = read_fasta_file(&output).unwrap();
        assert_eq!(records, vec![FastaRecord::new("long", "ACGTACGTAC")]);
    }
}
