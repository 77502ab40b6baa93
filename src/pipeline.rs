//! The forecast aggregation pipeline
//!
//! Models the dependent calls against the NWS as an explicit ordered
//! pipeline with per-stage error containment: a failed stage is logged and
//! skips only the stages that depend on its output, leaving every other
//! section of the dashboard populated. The stages run in the original
//! order: points, daily forecast, hourly forecast, point alerts, nearest
//! station and its latest observation.

use crate::models::{AlertFeature, CurrentConditions, DailyPeriod, HourlyPeriod, Location};
use crate::nws::NwsClient;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Number of daily periods the dashboard shows
pub const DAILY_PERIOD_COUNT: usize = 7;
/// Number of hourly periods the dashboard shows
pub const HOURLY_PERIOD_COUNT: usize = 12;

/// Everything the forecast pipeline produced for one location
///
/// Each section is independently best-effort; an empty list or `None`
/// means that stage failed or had nothing to report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForecastBundle {
    pub daily: Vec<DailyPeriod>,
    pub hourly: Vec<HourlyPeriod>,
    pub alerts: Vec<AlertFeature>,
    pub current: Option<CurrentConditions>,
}

/// Runs the dependent NWS call chain for a resolved location
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    nws: NwsClient,
}

impl ForecastPipeline {
    #[must_use]
    pub fn new(nws: NwsClient) -> Self {
        Self { nws }
    }

    /// Fetch all forecast sections for a location
    ///
    /// Never fails as a whole: stage errors degrade their own section and
    /// are written to the log.
    #[instrument(skip(self), fields(location = %location.display_name))]
    pub async fn run(&self, location: &Location) -> ForecastBundle {
        let mut bundle = ForecastBundle::default();
        let (lat, lon) = (location.latitude, location.longitude);

        // Stage 1: resolve the grid endpoints. Forecasts and the station
        // lookup hang off this document; alerts only need coordinates.
        let grid = match self.nws.points(lat, lon).await {
            Ok(grid) => Some(grid),
            Err(e) => {
                warn!("Grid endpoint lookup failed: {e:#}");
                None
            }
        };

        if let Some(grid) = &grid {
            // Stage 2: daily forecast
            match self.nws.forecast(&grid.forecast).await {
                Ok(mut periods) => {
                    periods.truncate(DAILY_PERIOD_COUNT);
                    bundle.daily = periods;
                }
                Err(e) => warn!("Daily forecast fetch failed: {e:#}"),
            }

            // Stage 3: hourly forecast
            match self.nws.forecast_hourly(&grid.forecast_hourly).await {
                Ok(mut periods) => {
                    periods.truncate(HOURLY_PERIOD_COUNT);
                    bundle.hourly = periods;
                }
                Err(e) => warn!("Hourly forecast fetch failed: {e:#}"),
            }
        }

        // Stage 4: active alerts for the point
        match self.nws.alerts_for_point(lat, lon).await {
            Ok(collection) => bundle.alerts = collection.features,
            Err(e) => warn!("Point alerts fetch failed: {e:#}"),
        }

        // Stage 5: nearest station, then its latest observation
        if let Some(grid) = &grid {
            bundle.current = self.fetch_current(&grid.observation_stations).await;
        }

        info!(
            daily = bundle.daily.len(),
            hourly = bundle.hourly.len(),
            alerts = bundle.alerts.len(),
            has_current = bundle.current.is_some(),
            "Forecast pipeline finished"
        );

        bundle
    }

    async fn fetch_current(&self, stations_url: &str) -> Option<CurrentConditions> {
        let station = match self.nws.nearest_station(stations_url).await {
            Ok(Some(station)) => station,
            Ok(None) => {
                warn!("No observation stations for this grid");
                return None;
            }
            Err(e) => {
                warn!("Station list fetch failed: {e:#}");
                return None;
            }
        };

        match self.nws.latest_observation(&station).await {
            Ok(observation) => Some(observation),
            Err(e) => {
                warn!("Latest observation fetch failed for {station}: {e:#}");
                None
            }
        }
    }
}
