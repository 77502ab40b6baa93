//! Sunrise/sunset enrichment via api.sunrisesunset.io
//!
//! Fetches a 4-day window starting today and builds a date-keyed map that
//! annotates the daily forecast cards. The window is anchored to a fixed
//! timezone, matching the upstream request the dashboard has always made.
//! Independent of the forecast pipeline; its failure only blanks the
//! sunrise/sunset lines.

use crate::config::UpstreamConfig;
use crate::http;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// Number of days in the enrichment window, including today
pub const WINDOW_DAYS: i64 = 4;

/// Sunrise and sunset clock times for one date, truncated to "H:MM"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

/// Mapping from ISO date string to that date's sun times
pub type SunriseSunsetMap = BTreeMap<String, SunTimes>;

#[derive(Debug, Deserialize)]
struct SunApiResponse {
    #[serde(default)]
    results: Vec<SunApiDay>,
}

#[derive(Debug, Deserialize)]
struct SunApiDay {
    date: String,
    sunrise: String,
    sunset: String,
}

/// Client for the sunrise/sunset range endpoint
#[derive(Debug, Clone)]
pub struct SunClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl SunClient {
    /// Create a new sunrise/sunset client from the upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.sun_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the 4-day sunrise/sunset window for a coordinate pair
    #[instrument(skip(self))]
    pub async fn window(&self, latitude: f64, longitude: f64) -> Result<SunriseSunsetMap> {
        let today = Utc::now().with_timezone(&New_York).date_naive();
        let (start, end) = window_bounds(today);

        let url = format!(
            "{}/json?lat={latitude}&lng={longitude}&date_start={start}&date_end={end}&timezone=America/New_York",
            self.base_url
        );

        let response: SunApiResponse = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Sunrise/sunset request failed")?
            .error_for_status()
            .with_context(|| "Sunrise/sunset request rejected")?
            .json()
            .await
            .with_context(|| "Failed to parse sunrise/sunset response")?;

        Ok(build_map(response.results))
    }
}

/// First and last date of the enrichment window starting at `today`
fn window_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(WINDOW_DAYS - 1))
}

fn build_map(days: Vec<SunApiDay>) -> SunriseSunsetMap {
    days.into_iter()
        .map(|day| {
            (
                day.date,
                SunTimes {
                    sunrise: clock_of(&day.sunrise),
                    sunset: clock_of(&day.sunset),
                },
            )
        })
        .collect()
}

/// Truncate an upstream time string like "6:32:10 AM" to "6:32"
fn clock_of(raw: &str) -> String {
    let mut parts = raw.split(':');
    match (parts.next(), parts.next()) {
        (Some(hour), Some(minute)) => format!("{hour}:{minute}"),
        _ => raw.to_string(),
    }
}
