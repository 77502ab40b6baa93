//! Data models for the skywatch dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Location: geographic coordinates plus a display name
//! - Forecast: daily and hourly forecast periods passed through from the NWS
//! - Alert: active-alert GeoJSON features with opaque geometry
//! - Observation: latest station observation in metric units

pub mod alert;
pub mod forecast;
pub mod location;
pub mod observation;

// Re-export all public types for convenient access
pub use alert::{AlertCollection, AlertFeature, AlertProperties};
pub use forecast::{DailyPeriod, HourlyPeriod};
pub use location::Location;
pub use observation::{CurrentConditions, Measurement};
