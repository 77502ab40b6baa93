//! JSON API consumed by the dashboard frontend
//!
//! Every endpoint is a read: the dashboard polls these after resolving a
//! location. Upstream failures degrade to empty sections rather than error
//! responses; the only 4xx source is input validation.

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{DailyPeriod, HourlyPeriod, Location};
use crate::nws::NwsClient;
use crate::session::DashboardSession;
use crate::severe::{
    self, ColoredAlert, HazardType, OutlookDay, RadarRegion, SupplementalProducts,
};
use crate::sun::SunTimes;
use crate::units;
use crate::geocode::GeocodingClient;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub session: DashboardSession,
    pub geocoder: GeocodingClient,
    pub nws: NwsClient,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/locate", get(locate))
        .route("/dashboard", get(dashboard))
        .route("/alerts/active", get(active_alerts))
        .route("/outlooks", get(outlooks))
        .route("/radar/regions", get(radar_regions))
        .route("/radar/viewers", get(radar_viewers))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

/// Resolve a free-text query and start a dashboard refresh for the hit
///
/// A missing match or a geocoder failure both answer `null`; the previous
/// dashboard state stays on screen.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Option<Location>>, StatusCode> {
    if params.q.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let location = match state.geocoder.search(&params.q).await {
        Ok(location) => location,
        Err(e) => {
            warn!("Geocoding failed for '{}': {e:#}", params.q);
            None
        }
    };

    if let Some(location) = &location {
        state.session.refresh(location.clone()).await;
    }

    Ok(Json(location))
}

#[derive(Debug, Deserialize)]
struct CoordParams {
    lat: f64,
    lon: f64,
}

impl CoordParams {
    fn validate(&self) -> Result<(), StatusCode> {
        if (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon) {
            Ok(())
        } else {
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Accept device coordinates, reverse geocode a name and start a refresh
async fn locate(
    State(state): State<AppState>,
    Query(params): Query<CoordParams>,
) -> Result<Json<Location>, StatusCode> {
    params.validate()?;

    let display_name = match state.geocoder.reverse(params.lat, params.lon).await {
        Ok(Some(name)) => name,
        Ok(None) => format!("{:.4}, {:.4}", params.lat, params.lon),
        Err(e) => {
            warn!("Reverse geocoding failed: {e:#}");
            format!("{:.4}, {:.4}", params.lat, params.lon)
        }
    };

    let location = Location::new(params.lat, params.lon, display_name);
    state.session.refresh(location.clone()).await;
    Ok(Json(location))
}

/// A daily forecast card with its sunrise/sunset annotation merged in
#[derive(Debug, Serialize)]
struct DailyCard {
    #[serde(flatten)]
    period: DailyPeriod,
    sunrise: String,
    sunset: String,
}

/// Current conditions converted to display units
#[derive(Debug, Serialize)]
struct CurrentDisplay {
    temperature: String,
    feels_like: String,
    conditions: String,
    wind: String,
}

/// Everything the dashboard page renders
#[derive(Debug, Serialize)]
struct DashboardView {
    location: Option<Location>,
    daily: Vec<DailyCard>,
    hourly: Vec<HourlyPeriod>,
    alerts: Vec<ColoredAlert>,
    current: Option<CurrentDisplay>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Serve the current dashboard snapshot
async fn dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let snapshot = state.session.snapshot().await;

    let daily = snapshot
        .bundle
        .daily
        .into_iter()
        .map(|period| {
            let times = snapshot.sun.get(period.date_key());
            let (sunrise, sunset) = match times {
                Some(SunTimes { sunrise, sunset }) => (sunrise.clone(), sunset.clone()),
                None => ("N/A".to_string(), "N/A".to_string()),
            };
            DailyCard {
                period,
                sunrise,
                sunset,
            }
        })
        .collect();

    let current = snapshot.bundle.current.map(|obs| CurrentDisplay {
        temperature: units::format_fahrenheit(obs.temperature.value),
        feels_like: units::format_fahrenheit(obs.feels_like_celsius()),
        conditions: obs.text_description.clone(),
        wind: units::format_wind_mph(obs.wind_speed.value),
    });

    Json(DashboardView {
        location: snapshot.location,
        daily,
        hourly: snapshot.bundle.hourly,
        alerts: snapshot
            .bundle
            .alerts
            .into_iter()
            .map(ColoredAlert::from)
            .collect(),
        current,
        updated_at: snapshot.updated_at,
    })
}

#[derive(Debug, Serialize)]
struct AlertLayer {
    features: Vec<ColoredAlert>,
}

/// Nationwide active alerts for the severe weather map, with layer colors
async fn active_alerts(State(state): State<AppState>) -> Json<AlertLayer> {
    let features = match state.nws.active_alerts().await {
        Ok(collection) => collection
            .features
            .into_iter()
            .map(ColoredAlert::from)
            .collect(),
        Err(e) => {
            warn!("Nationwide alerts fetch failed: {e:#}");
            Vec::new()
        }
    };
    Json(AlertLayer { features })
}

#[derive(Debug, Serialize)]
struct OutlookEntry {
    day: u8,
    hazard: HazardType,
    image_url: String,
    page_url: String,
}

#[derive(Debug, Serialize)]
struct OutlookCatalog {
    outlooks: Vec<OutlookEntry>,
    products: SupplementalProducts,
}

/// The full day/hazard grid of outlook image URLs plus the fixed products
async fn outlooks() -> Json<OutlookCatalog> {
    let mut entries = Vec::new();
    for &day in OutlookDay::all() {
        for &hazard in HazardType::all() {
            entries.push(OutlookEntry {
                day: day.number(),
                hazard,
                image_url: severe::outlook_image_url(day, hazard),
                page_url: severe::outlook_page_url(day),
            });
        }
    }
    Json(OutlookCatalog {
        outlooks: entries,
        products: SupplementalProducts::catalog(),
    })
}

#[derive(Debug, Serialize)]
struct RegionEntry {
    label: &'static str,
    url: String,
}

/// Region selector catalog for the embedded radar viewer
async fn radar_regions() -> Json<Vec<RegionEntry>> {
    Json(
        RadarRegion::all()
            .iter()
            .map(|&region| RegionEntry {
                label: region.label(),
                url: region.viewer_url(),
            })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
struct ViewerParams {
    lat: f64,
    lon: f64,
    /// Ridge radar site for the animated loop; defaults to Atlanta
    site: Option<String>,
}

#[derive(Debug, Serialize)]
struct RadarViewers {
    rainviewer: String,
    windy: String,
    ridge_loop: String,
}

/// Embeddable radar viewer URLs for a coordinate pair
async fn radar_viewers(
    Query(params): Query<ViewerParams>,
) -> Result<Json<RadarViewers>, StatusCode> {
    let coords = CoordParams {
        lat: params.lat,
        lon: params.lon,
    };
    coords.validate()?;

    let site = params.site.as_deref().unwrap_or("KFFC");
    Ok(Json(RadarViewers {
        rainviewer: severe::rainviewer_embed_url(params.lat, params.lon),
        windy: severe::windy_embed_url(params.lat, params.lon),
        ridge_loop: severe::ridge_loop_url(site),
    }))
}
