//! iNaturalist API client
//!
//! Paged observation search plus place lookups used to label sequences with
//! country and state.

use crate::api::retry::{check_status, with_retry};
use crate::api::{build_http_client, endpoints, types::*};
use crate::config::Config;
use crate::error::Result;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Placeholder for unknown country or state
pub const UNKNOWN_PLACE: &str = "NA";

/// API client for iNaturalist
pub struct InatClient {
    client: Client,
    base_url: String,

    /// Place lookups for this run; `None` records a failed or empty lookup
    place_cache: HashMap<u64, Option<Place>>,
}

impl InatClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout())?,
            base_url: base_url.into(),
            place_cache: HashMap::new(),
        })
    }

    /// Create from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.inat_url.clone(), config)
    }

    /// Fetch one page of observations for a taxon
    pub async fn observations_page(
        &self,
        taxon_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ObservationsPage> {
        let url = endpoints::inat_observations_url(&self.base_url, taxon_id, page, per_page);

        with_retry("iNaturalist observations", || async {
            let response = self.client.get(&url).send().await?;
            let response = check_status(response, "iNaturalist observation search").await?;
            Ok(response.json::<ObservationsPage>().await?)
        })
        .await
    }

    /// Look up a place by ID, with caching
    pub async fn place(&mut self, place_id: u64) -> Option<Place> {
        if let Some(cached) = self.place_cache.get(&place_id) {
            return cached.clone();
        }

        let place = match self.fetch_place(place_id).await {
            Ok(place) => place,
            Err(e) => {
                warn!(place_id = place_id, error = %e, "Place lookup failed");
                None
            },
        };

        self.place_cache.insert(place_id, place.clone());
        place
    }

    async fn fetch_place(&self, place_id: u64) -> Result<Option<Place>> {
        let url = endpoints::inat_place_url(&self.base_url, place_id);

        let response: PlacesResponse = with_retry("iNaturalist place", || async {
            let response = self.client.get(&url).send().await?;
            let response = check_status(response, "iNaturalist place lookup").await?;
            Ok(response.json::<PlacesResponse>().await?)
        })
        .await?;

        debug!(place_id = place_id, found = !response.results.is_empty(), "Place lookup");
        Ok(response.results.into_iter().next())
    }

    /// Country and state of an observation from its place IDs
    ///
    /// Country is the first place at admin level 0 (`United States` is
    /// shortened to `USA`), state the first at admin level 10. Missing parts
    /// are `NA`.
    pub async fn country_state(&mut self, place_ids: &[u64]) -> (String, String) {
        let mut country: Option<String> = None;
        let mut state: Option<String> = None;

        for &pid in place_ids {
            let Some(place) = self.place(pid).await else {
                continue;
            };

            match (place.admin_level, place.name) {
                (Some(ADMIN_LEVEL_COUNTRY), Some(name)) if country.is_none() => {
                    country = Some(if name == "United States" {
                        "USA".to_string()
                    } else {
                        name
                    });
                },
                (Some(ADMIN_LEVEL_STATE), Some(name)) if state.is_none() => {
                    state = Some(name);
                },
                _ => {},
            }

            if country.is_some() && state.is_some() {
                break;
            }
        }

        (
            country.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            state.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        )
    }

    /// Number of distinct places looked up so far
    pub fn cached_places(&self) -> usize {
        self.place_cache.len()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn place_body(id: u64, name: &str, admin_level: i64) -> serde_json::Value {
        serde_json::json!({"results": [{"id": id, "name": name, "admin_level": admin_level}]})
    }

    #[test]
    fn test_client_creation() {
        let client = InatClient::new("http://localhost:9999/v1", &Config::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
        assert_eq!(client.cached_places(), 0);
    }

    #[tokio::test]
    async fn test_observations_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/observations"))
            .and(query_param("taxon_id", "951406"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_results": 1,
                "results": [{"id": 5, "ofvs": []}]
            })))
            .mount(&server)
            .await;

        let client = InatClient::new(server.uri(), &Config::new()).unwrap();
        let page = client.observations_page("951406", 1, 200).await.unwrap();
        assert_eq!(page.total_results, 1);
        assert_eq!(page.results[0].id, Some(5));
    }

    #[tokio::test]
    async fn test_country_state_with_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(place_body(1, "United States", 0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/places/14"))
            .respond_with(ResponseTemplate::new(200).set_body_json(place_body(14, "California", 10)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/places/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut client = InatClient::new(server.uri(), &Config::new()).unwrap();

        let first = client.country_state(&[99, 1, 14]).await;
        assert_eq!(first, ("USA".to_string(), "California".to_string()));

        // second observation in the same places hits the cache
        let second = client.country_state(&[1, 14]).await;
        assert_eq!(second, first);
        assert_eq!(client.cached_places(), 3);
    }

    #[tokio::test]
    async fn test_country_state_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(place_body(3, "Marin County", 20)))
            .mount(&server)
            .await;

        let mut client = InatClient::new(server.uri(), &Config::new()).unwrap();
        let (country, state) = client.country_state(&[3]).await;
        assert_eq!(country, "NA");
        assert_eq!(state, "NA");
        assert_eq!(client.country_state(&[]).await, ("NA".to_string(), "NA".to_string()));
    }
}
