//! Error types for the mycoseq CLI
//!
//! Every variant is shown to the user as-is, so messages say what went wrong
//! and what to try next.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Remote service answered with an error or an unexpected payload
    #[error("API error: {0}")]
    Api(String),

    /// Required input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// FASTA input could not be parsed
    #[error("Invalid FASTA input: {0}")]
    Fasta(#[from] mycoseq_common::SeqError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and the API URL.")]
    Http(#[from] reqwest::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// JSON parsing failed
    #[error("Failed to parse JSON response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// TSV report could not be written or read
    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),

    /// Sequence position argument is malformed
    #[error("Invalid position '{0}'. Use a 1-based number (e.g. 3) or an inclusive range (e.g. 5-7).")]
    InvalidPosition(String),

    /// A search matched nothing to download
    #[error("No sequences found for query: {0}")]
    NoSequences(String),

    /// User declined a confirmation prompt
    #[error("Aborted: {0}")]
    Aborted(String),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid position error
    pub fn invalid_position(arg: impl Into<String>) -> Self {
        Self::InvalidPosition(arg.into())
    }

    /// Whether repeating the request that produced this error might succeed
    ///
    /// Transport failures, timeouts, rate limiting and 5xx responses are
    /// transient; anything else (bad token, malformed payload) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => match e.status() {
                Some(status) => {
                    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                },
                None => e.is_timeout() || e.is_connect() || e.is_request(),
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_actionable() {
        let err = CliError::invalid_position("x-3");
        assert!(err.to_string().contains("x-3"));
        assert!(err.to_string().contains("5-7"));

        let err = CliError::config("MYCOBANK_ACCESS_TOKEN is not set");
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn test_non_http_errors_are_not_transient() {
        assert!(!CliError::api("bad payload").is_transient());
        assert!(!CliError::NoSequences("x".into()).is_transient());
    }
}
