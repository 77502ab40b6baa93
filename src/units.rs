//! Unit conversions from the metric observation record to display units
//!
//! The NWS observation endpoint reports metric values; the dashboard shows
//! imperial. Missing values degrade to fixed fallback text rather than
//! failing the card.

/// Convert degrees Celsius to degrees Fahrenheit
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert meters per second to miles per hour
#[must_use]
pub fn mps_to_mph(mps: f64) -> f64 {
    mps * 2.23694
}

/// Format a Celsius value as "88.0°F", or "N/A" when absent
#[must_use]
pub fn format_fahrenheit(celsius: Option<f64>) -> String {
    match celsius {
        Some(c) => format!("{:.1}°F", celsius_to_fahrenheit(c)),
        None => "N/A".to_string(),
    }
}

/// Format a wind speed in m/s as "9.2 mph", or "Calm" when absent
#[must_use]
pub fn format_wind_mph(mps: Option<f64>) -> String {
    match mps {
        Some(v) => format!("{:.1} mph", mps_to_mph(v)),
        None => "Calm".to_string(),
    }
}
