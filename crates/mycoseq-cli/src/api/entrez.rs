//! NCBI Entrez (E-utilities) client
//!
//! Requests are spaced out to stay under the NCBI rate limits: three per
//! second without an API key, ten with one.

use crate::api::retry::{check_status, with_retry};
use crate::api::{build_http_client, endpoints, types::*};
use crate::config::Config;
use crate::error::{CliError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// IDs per efetch request for FASTA downloads
pub const FETCH_CHUNK_SIZE: usize = 200;

/// efetch requests with more IDs than this send them as a POST form
pub const POST_ABOVE_IDS: usize = 200;

/// Minimum gap between requests without an API key
pub const PAUSE_WITHOUT_KEY: Duration = Duration::from_millis(340);

/// Minimum gap between requests with an API key
pub const PAUSE_WITH_KEY: Duration = Duration::from_millis(100);

/// API client for NCBI E-utilities
pub struct EntrezClient {
    client: Client,
    base_url: String,

    /// `&tool=..&email=..&api_key=..` suffix for every request
    identity: String,

    pause: Duration,
    last_request: Option<Instant>,
}

impl EntrezClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, config: &Config) -> Result<Self> {
        let pause = if config.ncbi_api_key.is_some() {
            PAUSE_WITH_KEY
        } else {
            PAUSE_WITHOUT_KEY
        };

        Ok(Self {
            client: build_http_client(config.timeout())?,
            base_url: base_url.into(),
            identity: endpoints::entrez_identity(
                config.ncbi_email.as_deref(),
                config.ncbi_api_key.as_deref(),
            ),
            pause,
            last_request: None,
        })
    }

    /// Create from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.entrez_url.clone(), config)
    }

    /// Override the gap between requests
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Number of records matching a query
    pub async fn count(&mut self, query: &str) -> Result<u64> {
        let result = self.esearch(query, 0).await?;
        result
            .count
            .trim()
            .parse()
            .map_err(|_| CliError::api(format!("Entrez returned a non-numeric count '{}'", result.count)))
    }

    /// IDs of up to `retmax` records matching a query
    pub async fn search_ids(&mut self, query: &str, retmax: u64) -> Result<Vec<String>> {
        Ok(self.esearch(query, retmax).await?.idlist)
    }

    /// Download FASTA text for the given IDs, in chunks
    pub async fn fetch_fasta(&mut self, ids: &[String]) -> Result<String> {
        let mut text = String::new();

        for (i, chunk) in ids.chunks(FETCH_CHUNK_SIZE).enumerate() {
            debug!(chunk = i + 1, ids = chunk.len(), "Fetching FASTA from Entrez");
            let part = self.efetch(chunk, "fasta").await?;
            text.push_str(&part);
            if !text.ends_with('\n') {
                text.push('\n');
            }
        }

        Ok(text)
    }

    /// Download GenBank flat-file text for the given accessions
    pub async fn fetch_genbank(&mut self, accessions: &[String]) -> Result<String> {
        debug!(accessions = accessions.len(), "Fetching GenBank records from Entrez");
        self.efetch(accessions, "gb").await
    }

    async fn esearch(&mut self, query: &str, retmax: u64) -> Result<ESearchResult> {
        let url = endpoints::entrez_esearch_url(&self.base_url, query, retmax, &self.identity);
        self.throttle().await;

        let client = &self.client;
        let response: ESearchResponse = with_retry("Entrez esearch", || async {
            let response = client.get(&url).send().await?;
            let response = check_status(response, "Entrez search").await?;
            Ok(response.json::<ESearchResponse>().await?)
        })
        .await?;

        let result = response.esearchresult;
        if let Some(err) = result.error {
            return Err(CliError::api(format!("Entrez search failed: {}", err)));
        }

        debug!(query = %query, count = %result.count, ids = result.idlist.len(), "Entrez search");
        Ok(result)
    }

    async fn efetch(&mut self, ids: &[String], rettype: &str) -> Result<String> {
        let use_post = ids.len() > POST_ABOVE_IDS;
        let url = if use_post {
            endpoints::entrez_efetch_endpoint(&self.base_url)
        } else {
            endpoints::entrez_efetch_url(&self.base_url, ids, rettype, &self.identity)
        };
        let form = endpoints::entrez_efetch_params(ids, rettype, &self.identity);
        self.throttle().await;

        let client = &self.client;
        with_retry("Entrez efetch", || async {
            let request = if use_post {
                client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(form.clone())
            } else {
                client.get(&url)
            };
            let response = check_status(request.send().await?, "Entrez fetch").await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Wait until at least `pause` has passed since the previous request
    async fn throttle(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.pause {
                tokio::time::sleep(self.pause - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
