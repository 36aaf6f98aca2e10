//! MycoBank taxon names client
//!
//! All requests carry the bearer token from `MYCOBANK_ACCESS_TOKEN`.

use crate::api::retry::{check_status, with_retry};
use crate::api::{build_http_client, endpoints, types::*};
use crate::config::Config;
use crate::error::Result;
use reqwest::Client;
use tracing::debug;

/// API client for the MycoBank taxon names service
pub struct MycoBankClient {
    client: Client,
    base_url: String,
    token: String,
}

impl MycoBankClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout())?,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Create from configuration; fails when no access token is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.require_mycobank_token()?;
        Self::new(config.mycobank_url.clone(), token, config)
    }

    /// Search names starting with any of the given species
    pub async fn search_batch(&self, species: &[String]) -> Result<Vec<TaxonName>> {
        let filter = endpoints::mycobank_name_filter(species);
        let url = endpoints::mycobank_search_url(&self.base_url, &filter);

        debug!(batch_size = species.len(), "Searching MycoBank");

        let page: TaxonNamesPage = with_retry("MycoBank search", || async {
            let response = self.client.get(&url).bearer_auth(&self.token).send().await?;
            let response = check_status(response, "MycoBank name search").await?;
            Ok(response.json::<TaxonNamesPage>().await?)
        })
        .await?;

        debug!(items = page.items.len(), "MycoBank search returned");
        Ok(page.items)
    }

    /// Fetch a single name record by ID
    pub async fn get_name(&self, id: i64) -> Result<TaxonName> {
        let url = endpoints::mycobank_record_url(&self.base_url, id);

        with_retry("MycoBank record", || async {
            let response = self.client.get(&url).bearer_auth(&self.token).send().await?;
            let response = check_status(response, "MycoBank record lookup").await?;
            Ok(response.json::<TaxonName>().await?)
        })
        .await
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
