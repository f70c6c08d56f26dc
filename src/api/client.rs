//! PokeAPI HTTP client with response caching
//!
//! Every GET goes through the client's `TtlCache`, keyed by the full request
//! URL, so repeated lookups within the cache interval never touch the network.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::{AreaInfo, AreaPage, NamedResource, PokemonInfo};
use crate::cache::TtlCache;

/// Base URL for the public PokeAPI
pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Errors that can occur when talking to PokeAPI
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("You're on the first page")]
    NoPreviousPage,

    #[error("You're on the last page")]
    NoNextPage,
}

/// Client for fetching PokeAPI resources
///
/// Tracks the location-area pagination cursor so `next_areas` and
/// `previous_areas` can walk the listing like the `map`/`mapb` commands do.
#[derive(Debug)]
pub struct PokeClient {
    client: Client,
    base_url: String,
    cache: TtlCache,
    next_url: Option<String>,
    previous_url: Option<String>,
}

impl PokeClient {
    /// Create a client rooted at `base_url` (which must end with `/`)
    pub fn new(base_url: impl Into<String>, cache: TtlCache) -> Self {
        Self::with_client(Client::new(), base_url, cache)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>, cache: TtlCache) -> Self {
        let base_url = base_url.into();
        let next_url = Some(format!("{}location-area/", base_url));
        Self {
            client,
            base_url,
            cache,
            next_url,
            previous_url: None,
        }
    }

    /// The response cache backing this client
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Fetch the next page of location areas
    ///
    /// The first call loads the first page.
    ///
    /// # Returns
    /// * `Ok(Vec<NamedResource>)` - Areas on the page
    /// * `Err(ApiError::NoNextPage)` - If the last page was already shown
    pub async fn next_areas(&mut self) -> Result<Vec<NamedResource>, ApiError> {
        let url = self.next_url.clone().ok_or(ApiError::NoNextPage)?;
        self.load_areas(&url).await
    }

    /// Fetch the previous page of location areas
    ///
    /// # Returns
    /// * `Ok(Vec<NamedResource>)` - Areas on the page
    /// * `Err(ApiError::NoPreviousPage)` - If no earlier page exists
    pub async fn previous_areas(&mut self) -> Result<Vec<NamedResource>, ApiError> {
        let url = self.previous_url.clone().ok_or(ApiError::NoPreviousPage)?;
        self.load_areas(&url).await
    }

    /// Fetch the pokemon encountered in a location area
    pub async fn area_info(&self, name: &str) -> Result<AreaInfo, ApiError> {
        let url = self.resource_url("location-area", name);
        self.fetch_json(&url).await
    }

    /// Fetch details of a single pokemon
    pub async fn pokemon_info(&self, name: &str) -> Result<PokemonInfo, ApiError> {
        let url = self.resource_url("pokemon", name);
        self.fetch_json(&url).await
    }

    async fn load_areas(&mut self, url: &str) -> Result<Vec<NamedResource>, ApiError> {
        let page: AreaPage = self.fetch_json(url).await?;

        // Only move the cursor once the page parsed
        self.next_url = page.next;
        self.previous_url = page.previous;

        Ok(page.results)
    }

    fn resource_url(&self, kind: &str, name: &str) -> String {
        format!("{}{}/{}", self.base_url, kind, name.trim().to_lowercase())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.fetch_cached(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Returns the response body for `url`, from cache when possible
    async fn fetch_cached(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        if let Some(body) = self.cache.get(url) {
            debug!(url, bytes = body.len(), "cache hit");
            return Ok(body);
        }

        debug!(url, "cache miss");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?.to_vec();
        self.cache.add(url, body.clone());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PokeClient {
        let cache = TtlCache::new(Duration::from_secs(60)).unwrap();
        PokeClient::new(format!("{}/", server.uri()), cache)
    }

    fn pikachu() -> serde_json::Value {
        json!({
            "name": "pikachu",
            "base_experience": 112,
            "height": 4,
            "weight": 60,
            "stats": [{"base_stat": 35, "stat": {"name": "hp", "url": ""}}],
            "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}]
        })
    }

    fn area_page(names: &[&str], next: Option<String>, previous: Option<String>) -> serde_json::Value {
        let results: Vec<_> = names
            .iter()
            .map(|name| json!({"name": name, "url": ""}))
            .collect();
        json!({"count": 4, "next": next, "previous": previous, "results": results})
    }

    #[tokio::test]
    async fn test_pokemon_info_is_served_from_cache_on_repeat() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pikachu()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        let first = client.pokemon_info("pikachu").await.expect("first fetch");
        let second = client.pokemon_info("Pikachu ").await.expect("cached fetch");

        assert_eq!(first, second);
        assert_eq!(first.base_experience, Some(112));
        assert_eq!(client.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_reported_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);

        for _ in 0..2 {
            let err = client.pokemon_info("missingno").await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
        }
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let err = client.area_info("anywhere").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let err = client.area_info("broken").await.unwrap_err();
        assert!(matches!(err, ApiError::ParseError(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_area_info_lists_encounters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/pastoria-city-area"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "pastoria-city-area",
                "pokemon_encounters": [
                    {"pokemon": {"name": "tentacool", "url": ""}},
                    {"pokemon": {"name": "magikarp", "url": ""}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let info = client.area_info("pastoria-city-area").await.expect("area info");
        assert_eq!(info.pokemon_names(), vec!["tentacool", "magikarp"]);
    }

    #[tokio::test]
    async fn test_pagination_walks_forward_and_back() {
        let server = MockServer::start().await;
        let first_url = format!("{}/location-area/", server.uri());
        let second_url = format!("{}/location-area/?offset=2&limit=2", server.uri());

        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .and(query_param_is_missing("offset"))
            .respond_with(ResponseTemplate::new(200).set_body_json(area_page(
                &["canalave-city-area", "eterna-city-area"],
                Some(second_url.clone()),
                None,
            )))
            // Going back to page one is a cache hit
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(area_page(
                &["pastoria-city-area", "sunyshore-city-area"],
                None,
                Some(first_url.clone()),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);

        assert!(matches!(client.previous_areas().await, Err(ApiError::NoPreviousPage)));

        let page = client.next_areas().await.expect("first page");
        assert_eq!(page[0].name, "canalave-city-area");
        assert!(matches!(client.previous_areas().await, Err(ApiError::NoPreviousPage)));

        let page = client.next_areas().await.expect("second page");
        assert_eq!(page[1].name, "sunyshore-city-area");
        assert!(matches!(client.next_areas().await, Err(ApiError::NoNextPage)));

        let page = client.previous_areas().await.expect("back to first page");
        assert_eq!(page[1].name, "eterna-city-area");
        assert_eq!(client.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_load_keeps_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let mut client = client_for(&server);

        assert!(client.next_areas().await.is_err());
        // Still pointing at page one, so the retry hits the server again
        assert!(matches!(
            client.next_areas().await,
            Err(ApiError::Status { status: 500, .. })
        ));
    }
}
