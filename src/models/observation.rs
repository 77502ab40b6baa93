//! Latest station observation from the NWS, in metric units
//!
//! Fields arrive as `{ "value": ..., "unitCode": ... }` wrappers and the
//! values are frequently null (wind chill in summer, heat index in winter).
//! Conversion to display units happens at render time in `units`.

use serde::{Deserialize, Serialize};

/// One measured quantity with its value possibly absent
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Measurement {
    pub value: Option<f64>,
    #[serde(default, rename = "unitCode")]
    pub unit_code: Option<String>,
}

/// The current-conditions record the dashboard displays
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Temperature in degrees Celsius
    #[serde(default)]
    pub temperature: Measurement,
    /// Heat index in degrees Celsius, null outside hot weather
    #[serde(default)]
    pub heat_index: Measurement,
    /// Wind chill in degrees Celsius, null outside cold weather
    #[serde(default)]
    pub wind_chill: Measurement,
    /// Wind speed; the dashboard treats the value as m/s
    #[serde(default)]
    pub wind_speed: Measurement,
    /// Short prose description, e.g. "Mostly Cloudy"
    #[serde(default)]
    pub text_description: String,
}

impl CurrentConditions {
    /// The "feels like" value: heat index when present, else wind chill
    #[must_use]
    pub fn feels_like_celsius(&self) -> Option<f64> {
        self.heat_index.value.or(self.wind_chill.value)
    }
}
