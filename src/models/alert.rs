//! Active-alert models: GeoJSON features passed through from the NWS
//!
//! The geometry is kept opaque (`serde_json::Value`); the map layer on the
//! client consumes it directly and the server never interprets it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GeoJSON FeatureCollection of active alerts
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AlertCollection {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
}

/// One alert feature
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlertFeature {
    pub properties: AlertProperties,
    /// GeoJSON geometry, possibly null for zone-based alerts
    #[serde(default)]
    pub geometry: Option<Value>,
}

/// The alert fields the dashboard displays in the map popup
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlertProperties {
    /// Event name, e.g. "Tornado Warning"
    pub event: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}
