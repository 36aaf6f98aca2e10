//! Configuration management for the mycoseq CLI
//!
//! Endpoints, credentials and timeouts. Values come from the environment
//! (optionally seeded from a `.env` file); endpoint URLs can additionally be
//! overridden with global command-line flags.

use crate::error::{CliError, Result};
use serde::Serialize;
use std::time::Duration;

// ============================================================================
// Defaults
// ============================================================================

/// iNaturalist v1 REST API
pub const DEFAULT_INAT_URL: &str = "https://api.inaturalist.org/v1";

/// MycoBank taxon names web service
pub const DEFAULT_MYCOBANK_URL: &str =
    "https://webservices.bio-aware.com/cbsdatabase_new/mycobank/taxonnames";

/// NCBI E-utilities
pub const DEFAULT_ENTREZ_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Per-request timeout; GenBank flat-file batches can be slow
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// CLI configuration
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub inat_url: String,
    pub mycobank_url: String,
    pub entrez_url: String,

    /// Contact address sent with Entrez requests
    pub ncbi_email: Option<String>,

    #[serde(skip_serializing)]
    pub ncbi_api_key: Option<String>,

    #[serde(skip_serializing)]
    pub mycobank_token: Option<String>,

    pub timeout_secs: u64,

    pub verbose: bool,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self {
            inat_url: DEFAULT_INAT_URL.to_string(),
            mycobank_url: DEFAULT_MYCOBANK_URL.to_string(),
            entrez_url: DEFAULT_ENTREZ_URL.to_string(),
            ncbi_email: None,
            ncbi_api_key: None,
            mycobank_token: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            verbose: false,
        }
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Some(url) = non_empty_var("INAT_API_URL") {
            config.inat_url = url;
        }

        if let Some(url) = non_empty_var("MYCOBANK_API_URL") {
            config.mycobank_url = url;
        }

        if let Some(url) = non_empty_var("ENTREZ_API_URL") {
            config.entrez_url = url;
        }

        config.ncbi_email = non_empty_var("NCBI_EMAIL");
        config.ncbi_api_key = non_empty_var("NCBI_API_KEY");
        config.mycobank_token = non_empty_var("MYCOBANK_ACCESS_TOKEN");

        if let Some(secs) = non_empty_var("MYCOSEQ_API_TIMEOUT_SECS") {
            config.timeout_secs = secs.parse().map_err(|_| {
                CliError::config(format!(
                    "MYCOSEQ_API_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
        }

        Ok(config)
    }

    /// Override the endpoint URLs (from command-line flags)
    pub fn set_endpoints(
        &mut self,
        inat_url: impl Into<String>,
        mycobank_url: impl Into<String>,
        entrez_url: impl Into<String>,
    ) {
        self.inat_url = inat_url.into();
        self.mycobank_url = mycobank_url.into();
        self.entrez_url = entrez_url.into();
    }

    /// Enable verbose output
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// HTTP request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// MycoBank bearer token, required by the `current-name` command
    pub fn require_mycobank_token(&self) -> Result<&str> {
        self.mycobank_token.as_deref().ok_or_else(|| {
            CliError::config("MYCOBANK_ACCESS_TOKEN environment variable not set")
        })
    }

    /// Look up a setting by key, as shown by `mycoseq config get`
    ///
    /// Credentials are reported as `set` / `not set`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "inat_url" => self.inat_url.clone(),
            "mycobank_url" => self.mycobank_url.clone(),
            "entrez_url" => self.entrez_url.clone(),
            "ncbi_email" => self.ncbi_email.clone().unwrap_or_else(|| "not set".to_string()),
            "ncbi_api_key" => presence(&self.ncbi_api_key),
            "mycobank_token" => presence(&self.mycobank_token),
            "timeout_secs" => self.timeout_secs.to_string(),
            "verbose" => self.verbose.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// All keys understood by [`Config::get`], in display order
    pub const KEYS: [&'static str; 8] = [
        "inat_url",
        "mycobank_url",
        "entrez_url",
        "ncbi_email",
        "ncbi_api_key",
        "mycobank_token",
        "timeout_secs",
        "verbose",
    ];
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn presence(secret: &Option<String>) -> String {
    if secret.is_some() { "set" } else { "not set" }.to_string()
}
