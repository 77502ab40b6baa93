//! Client for the National Weather Service API (api.weather.gov)
//!
//! The NWS API is navigational: a "points" lookup keyed by coordinates
//! returns the URLs for that grid's forecast products, and those URLs are
//! fetched as-is. Everything is unauthenticated HTTPS GET returning JSON.

use crate::config::UpstreamConfig;
use crate::http;
use crate::models::{AlertCollection, CurrentConditions, DailyPeriod, HourlyPeriod};
use anyhow::{Context, Result};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

/// The grid endpoint document returned by `/points/{lat},{lon}`
#[derive(Debug, Clone, Deserialize)]
pub struct GridEndpoints {
    /// URL of the daily forecast for this grid
    pub forecast: String,
    /// URL of the hourly forecast for this grid
    #[serde(rename = "forecastHourly")]
    pub forecast_hourly: String,
    /// URL of the observation-station list for this grid
    #[serde(rename = "observationStations")]
    pub observation_stations: String,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: GridEndpoints,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse<T> {
    properties: PeriodsProperties<T>,
}

#[derive(Debug, Deserialize)]
struct PeriodsProperties<T> {
    periods: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StationListResponse {
    #[serde(default)]
    features: Vec<StationFeature>,
}

#[derive(Debug, Deserialize)]
struct StationFeature {
    properties: StationProperties,
}

#[derive(Debug, Deserialize)]
struct StationProperties {
    #[serde(rename = "stationIdentifier")]
    station_identifier: String,
}

#[derive(Debug, Deserialize)]
struct ObservationResponse {
    properties: CurrentConditions,
}

/// Client for the NWS forecast, alert and observation endpoints
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NwsClient {
    /// Create a new NWS client from the upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.nws_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("{what} request failed"))?
            .error_for_status()
            .with_context(|| format!("{what} request rejected"))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {what} response"))
    }

    /// Resolve the grid endpoint URLs for a coordinate pair
    #[instrument(skip(self))]
    pub async fn points(&self, latitude: f64, longitude: f64) -> Result<GridEndpoints> {
        let url = format!("{}/points/{latitude},{longitude}", self.base_url);
        let response: PointsResponse = self.get_json(&url, "points lookup").await?;
        Ok(response.properties)
    }

    /// Fetch the daily forecast from a grid endpoint URL
    #[instrument(skip(self, url))]
    pub async fn forecast(&self, url: &str) -> Result<Vec<DailyPeriod>> {
        let response: ForecastResponse<DailyPeriod> =
            self.get_json(url, "daily forecast").await?;
        Ok(response.properties.periods)
    }

    /// Fetch the hourly forecast from a grid endpoint URL
    #[instrument(skip(self, url))]
    pub async fn forecast_hourly(&self, url: &str) -> Result<Vec<HourlyPeriod>> {
        let response: ForecastResponse<HourlyPeriod> =
            self.get_json(url, "hourly forecast").await?;
        Ok(response.properties.periods)
    }

    /// Fetch the active alerts covering a point
    #[instrument(skip(self))]
    pub async fn alerts_for_point(&self, latitude: f64, longitude: f64) -> Result<AlertCollection> {
        let url = format!(
            "{}/alerts/active?point={latitude},{longitude}",
            self.base_url
        );
        self.get_json(&url, "point alerts").await
    }

    /// Fetch all active alerts nationwide (severe weather map layer)
    #[instrument(skip(self))]
    pub async fn active_alerts(&self) -> Result<AlertCollection> {
        let url = format!("{}/alerts/active", self.base_url);
        self.get_json(&url, "active alerts").await
    }

    /// Resolve the nearest observation station from a station-list URL
    ///
    /// The NWS orders the list by distance, so the first entry wins.
    #[instrument(skip(self, url))]
    pub async fn nearest_station(&self, url: &str) -> Result<Option<String>> {
        let response: StationListResponse = self.get_json(url, "station list").await?;
        Ok(response
            .features
            .into_iter()
            .next()
            .map(|f| f.properties.station_identifier))
    }

    /// Fetch the latest observation for a station
    #[instrument(skip(self))]
    pub async fn latest_observation(&self, station_id: &str) -> Result<CurrentConditions> {
        let url = format!(
            "{}/stations/{station_id}/observations/latest",
            self.base_url
        );
        let response: ObservationResponse = self.get_json(&url, "latest observation").await?;
        Ok(response.properties)
    }
}
