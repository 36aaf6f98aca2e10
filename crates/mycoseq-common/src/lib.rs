//! mycoseq Common Library
//!
//! Shared sequence types, parsers, and logging for the mycoseq toolkit.
//!
//! # Overview
//!
//! - **FASTA**: Record model, reader and writer
//! - **Sequence cleaning**: Trimming of raw ITS submissions to valid IUPAC DNA
//! - **GenBank**: Flat-file helpers for accession and geography metadata
//! - **Logging**: `tracing` subscriber setup shared by all binaries
//!
//! # Example
//!
//! ```no_run
//! use mycoseq_common::fasta::read_fasta_file;
//!
//! fn count(path: &str) -> mycoseq_common::Result<usize> {
//!     let records = read_fasta_file(path)?;
//!     Ok(records.len())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod fasta;
pub mod genbank;
pub mod logging;
pub mod sequence;

// Re-export commonly used types
pub use error::{Result, SeqError};
pub use fasta::FastaRecord;
