//! Location resolution via the Nominatim (OpenStreetMap) geocoder
//!
//! Forward geocoding turns a free-text query into coordinates plus a
//! display name; reverse geocoding turns device coordinates back into a
//! display name. Both take the first result and nothing else. No API key
//! is required, but Nominatim insists on a real User-Agent.

use crate::config::UpstreamConfig;
use crate::http;
use crate::models::Location;
use anyhow::{Context, Result};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// One entry of a Nominatim `/search` response; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// A Nominatim `/reverse` response
#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
}

/// Client for the Nominatim search and reverse-geocoding endpoints
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl GeocodingClient {
    /// Create a new geocoding client from the upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a free-text place query to a location
    ///
    /// Takes the first result's coordinates and display name. Returns
    /// `Ok(None)` when the geocoder has no match for the query.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<Location>> {
        let url = format!(
            "{}/search?format=json&q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let results: Vec<SearchResult> = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Geocoding request failed")?
            .error_for_status()
            .with_context(|| "Geocoding request rejected")?
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        let Some(first) = results.into_iter().next() else {
            warn!("No geocoding results for '{}'", query);
            return Ok(None);
        };

        let latitude = first
            .lat
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude in geocoding result: {}", first.lat))?;
        let longitude = first
            .lon
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude in geocoding result: {}", first.lon))?;

        debug!(
            "Geocoded '{}' to {} ({:.4}, {:.4})",
            query, first.display_name, latitude, longitude
        );

        Ok(Some(Location::new(latitude, longitude, first.display_name)))
    }

    /// Resolve coordinates to a display name
    ///
    /// Used when the client falls back to device location. Returns
    /// `Ok(None)` when the geocoder has no name for the point.
    #[instrument(skip(self))]
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        let url = format!(
            "{}/reverse?format=json&lat={latitude}&lon={longitude}",
            self.base_url
        );

        let result: ReverseResult = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Reverse geocoding request failed")?
            .error_for_status()
            .with_context(|| "Reverse geocoding request rejected")?
            .json()
            .await
            .with_context(|| "Failed to parse reverse geocoding response")?;

        if result.display_name.is_none() {
            debug!("No display name for ({:.4}, {:.4})", latitude, longitude);
        }

        Ok(result.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeocodingClient {
        let config = UpstreamConfig {
            nominatim_base_url: server.uri(),
            ..UpstreamConfig::default()
        };
        GeocodingClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_search_takes_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Atlanta, GA"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[
                    {"lat": "33.7489924", "lon": "-84.3902644", "display_name": "Atlanta, Fulton County, Georgia, United States"},
                    {"lat": "34.0", "lon": "-85.0", "display_name": "Atlanta (somewhere else)"}
                ]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let location = client_for(&server)
            .search("Atlanta, GA")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.latitude, 33.7489924);
        assert_eq!(location.longitude, -84.3902644);
        assert!(location.display_name.starts_with("Atlanta, Fulton County"));
    }

    #[tokio::test]
    async fn test_search_empty_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&server)
            .await;

        let result = client_for(&server).search("nowhere at all").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_search_propagates_parse_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
            .mount(&server)
            .await;

        assert!(client_for(&server).search("Atlanta").await.is_err());
    }

    #[tokio::test]
    async fn test_reverse_returns_display_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"display_name": "Marietta, Cobb County, Georgia, United States"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let name = client_for(&server).reverse(33.9526, -84.5499).await.unwrap();
        assert_eq!(
            name.as_deref(),
            Some("Marietta, Cobb County, Georgia, United States")
        );
    }
}
