//! Forecast period models passed through from the NWS forecast endpoints
//!
//! These records are deliberately close to the upstream wire format: the
//! dashboard renders them as-is, so anything beyond renaming to snake case
//! would just be churn.

use serde::{Deserialize, Serialize};

/// One period of the daily forecast ("Tonight", "Friday", ...)
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyPeriod {
    pub number: u32,
    /// Period label, e.g. "Friday Night"
    pub name: String,
    /// ISO 8601 start of the period
    pub start_time: String,
    pub is_daytime: bool,
    pub temperature: i32,
    /// "F" or "C" as reported upstream
    pub temperature_unit: String,
    pub short_forecast: String,
    #[serde(default)]
    pub detailed_forecast: String,
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// One period of the hourly forecast
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPeriod {
    pub number: u32,
    /// ISO 8601 start of the hour
    pub start_time: String,
    pub is_daytime: bool,
    pub temperature: i32,
    pub temperature_unit: String,
    pub short_forecast: String,
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: String,
    /// Chance of precipitation; the value is often null upstream
    #[serde(default)]
    pub probability_of_precipitation: Option<PrecipitationChance>,
}

/// Probability-of-precipitation wrapper as the NWS nests it
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PrecipitationChance {
    pub value: Option<f64>,
}

impl HourlyPeriod {
    /// Chance of precipitation as a whole percentage, defaulting to 0
    #[must_use]
    pub fn precipitation_percent(&self) -> u32 {
        self.probability_of_precipitation
            .as_ref()
            .and_then(|p| p.value)
            .unwrap_or(0.0) as u32
    }

    /// The calendar date of this period, e.g. "2026-08-29"
    #[must_use]
    pub fn date_key(&self) -> &str {
        date_of(&self.start_time)
    }
}

impl DailyPeriod {
    /// The calendar date of this period, used to join sunrise/sunset times
    #[must_use]
    pub fn date_key(&self) -> &str {
        date_of(&self.start_time)
    }
}

/// Date prefix of an ISO 8601 timestamp ("2026-08-29T18:00:00-04:00")
fn date_of(iso: &str) -> &str {
    iso.split('T').next().unwrap_or(iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hourly(precip: Option<f64>) -> HourlyPeriod {
        HourlyPeriod {
            number: 1,
            start_time: "2026-08-29T14:00:00-04:00".to_string(),
            is_daytime: true,
            temperature: 88,
            temperature_unit: "F".to_string(),
            short_forecast: "Sunny".to_string(),
            wind_speed: "5 mph".to_string(),
            wind_direction: "SW".to_string(),
            probability_of_precipitation: precip.map(|value| PrecipitationChance {
                value: Some(value),
            }),
        }
    }

    #[test]
    fn test_date_key_strips_time() {
        let hour = sample_hourly(None);
        assert_eq!(hour.date_key(), "2026-08-29");
    }

    #[test]
    fn test_precipitation_defaults_to_zero() {
        assert_eq!(sample_hourly(None).precipitation_percent(), 0);
        assert_eq!(sample_hourly(Some(40.0)).precipitation_percent(), 40);
    }

    #[test]
    fn test_daily_period_deserializes_from_nws_shape() {
        let json = r#"{
            "number": 1,
            "name": "Tonight",
            "startTime": "2026-08-29T18:00:00-04:00",
            "endTime": "2026-08-30T06:00:00-04:00",
            "isDaytime": false,
            "temperature": 68,
            "temperatureUnit": "F",
            "shortForecast": "Partly Cloudy",
            "detailedForecast": "Partly cloudy, with a low around 68.",
            "windSpeed": "5 to 10 mph",
            "windDirection": "NW",
            "icon": "https://api.weather.gov/icons/land/night/sct?size=medium"
        }"#;

        let period: DailyPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.name, "Tonight");
        assert_eq!(period.temperature, 68);
        assert_eq!(period.temperature_unit, "F");
        assert_eq!(period.date_key(), "2026-08-29");
        assert!(!period.is_daytime);
    }
}
