//! Error types for sequence handling

use thiserror::Error;

/// Result type alias for sequence operations
pub type Result<T> = std::result::Result<T, SeqError>;

/// Main error type for reading and writing sequence files
#[derive(Error, Debug)]
pub enum SeqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Empty FASTA header at line {0}")]
    EmptyHeader(usize),
}

impl SeqError {
    /// Create a parse error for the given 1-based line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
