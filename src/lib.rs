//! `skywatch` - self-hosted local and severe weather dashboard
//!
//! This library aggregates public weather data - geocoding, NWS forecasts
//! and alerts, sunrise/sunset times and SPC outlook imagery - and serves it
//! to a browser dashboard through a small JSON API.

pub mod api;
pub mod config;
pub mod error;
pub mod geocode;
pub mod http;
pub mod models;
pub mod nws;
pub mod pipeline;
pub mod session;
pub mod severe;
pub mod sun;
pub mod units;
pub mod web;

// Re-export core types for public API
pub use config::SkywatchConfig;
pub use error::SkywatchError;
pub use geocode::GeocodingClient;
pub use models::{AlertCollection, CurrentConditions, DailyPeriod, HourlyPeriod, Location};
pub use nws::NwsClient;
pub use pipeline::{ForecastBundle, ForecastPipeline};
pub use session::{DashboardSession, DashboardSnapshot};
pub use sun::{SunClient, SunriseSunsetMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkywatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
