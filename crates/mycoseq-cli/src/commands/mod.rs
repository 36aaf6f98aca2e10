//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod config;
pub mod current_name;
pub mod filter;
pub mod genbank;
pub mod inat;
pub mod print;

use crate::error::{CliError, Result};
use mycoseq_common::fasta::{read_fasta_file, FastaRecord};
use std::path::Path;

/// Read a FASTA file, reporting a missing file as [`CliError::FileNotFound`]
pub(crate) fn load_fasta(path: &Path) -> Result<Vec<FastaRecord>> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(read_fasta_file(path)?)
}

/// Create the parent directory of an output file if needed
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
