//! Dashboard session state
//!
//! Holds the most recent snapshot of everything the dashboard renders. A
//! refresh bumps a generation counter, aborts any still-running refresh,
//! and stage results are applied only while their generation is current,
//! so a superseded fetch can never overwrite newer state. State is
//! ephemeral; nothing is persisted.

use crate::models::Location;
use crate::pipeline::{ForecastBundle, ForecastPipeline};
use crate::sun::{SunClient, SunriseSunsetMap};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The state the dashboard renders from
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub location: Option<Location>,
    #[serde(flatten)]
    pub bundle: ForecastBundle,
    pub sun: SunriseSunsetMap,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Identifies one refresh; results tagged with a stale token are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

struct SessionInner {
    snapshot: RwLock<DashboardSnapshot>,
    generation: AtomicU64,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
    pipeline: ForecastPipeline,
    sun: SunClient,
}

/// Single dashboard session shared by the HTTP handlers
#[derive(Clone)]
pub struct DashboardSession {
    inner: Arc<SessionInner>,
}

impl DashboardSession {
    #[must_use]
    pub fn new(pipeline: ForecastPipeline, sun: SunClient) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                snapshot: RwLock::new(DashboardSnapshot::default()),
                generation: AtomicU64::new(0),
                task: std::sync::Mutex::new(None),
                pipeline,
                sun,
            }),
        }
    }

    /// Current snapshot, cheap clone for serialization
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.inner.snapshot.read().await.clone()
    }

    /// Start a refresh for a newly resolved location
    ///
    /// The location is visible immediately; the forecast pipeline and the
    /// sunrise/sunset window run in a background task. Any refresh still in
    /// flight is aborted and its generation invalidated.
    pub async fn refresh(&self, location: Location) {
        let token = self.begin_refresh(location).await;

        let session = self.clone();
        let handle = tokio::spawn(async move {
            session.run_refresh(token).await;
        });

        let previous = {
            let mut task = self
                .inner
                .task
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            task.replace(handle)
        };
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Wait for the most recently started refresh to finish (test support
    /// and graceful shutdown)
    pub async fn wait_for_refresh(&self) {
        let handle = {
            let mut task = self
                .inner
                .task
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            task.take()
        };
        if let Some(handle) = handle {
            // An aborted predecessor resolves to JoinError; either way the
            // refresh is over.
            let _ = handle.await;
        }
    }

    /// Bump the generation and reset the snapshot to the new location
    pub(crate) async fn begin_refresh(&self, location: Location) -> RefreshToken {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut snapshot = self.inner.snapshot.write().await;
        *snapshot = DashboardSnapshot {
            location: Some(location),
            ..DashboardSnapshot::default()
        };
        debug!("Refresh generation {generation} started");
        RefreshToken(generation)
    }

    async fn run_refresh(&self, token: RefreshToken) {
        let Some(location) = self.snapshot().await.location else {
            return;
        };
        let (lat, lon) = (location.latitude, location.longitude);

        // The forecast pipeline and the sunrise/sunset enricher are
        // independent; neither blocks the other's section.
        let bundle_fut = async {
            let bundle = self.inner.pipeline.run(&location).await;
            self.apply_bundle(token, bundle).await;
        };
        let sun_fut = async {
            match self.inner.sun.window(lat, lon).await {
                Ok(map) => self.apply_sun(token, map).await,
                Err(e) => warn!("Sunrise/sunset fetch failed: {e:#}"),
            }
        };
        futures::join!(bundle_fut, sun_fut);
    }

    /// Apply pipeline results unless a newer refresh has started
    pub(crate) async fn apply_bundle(&self, token: RefreshToken, bundle: ForecastBundle) {
        if !self.is_current(token) {
            debug!("Dropping superseded forecast results (generation {})", token.0);
            return;
        }
        let mut snapshot = self.inner.snapshot.write().await;
        snapshot.bundle = bundle;
        snapshot.updated_at = Some(Utc::now());
    }

    /// Apply sunrise/sunset results unless a newer refresh has started
    pub(crate) async fn apply_sun(&self, token: RefreshToken, sun: SunriseSunsetMap) {
        if !self.is_current(token) {
            debug!("Dropping superseded sun times (generation {})", token.0);
            return;
        }
        let mut snapshot = self.inner.snapshot.write().await;
        snapshot.sun = sun;
    }

    fn is_current(&self, token: RefreshToken) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::nws::NwsClient;
    use std::time::Duration;
    use wiremock::matchers::{method, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server: &MockServer) -> DashboardSession {
        let config = UpstreamConfig {
            nws_base_url: server.uri(),
            sun_base_url: server.uri(),
            ..UpstreamConfig::default()
        };
        DashboardSession::new(
            ForecastPipeline::new(NwsClient::new(&config).unwrap()),
            SunClient::new(&config).unwrap(),
        )
    }

    fn somewhere(name: &str) -> Location {
        Location::new(33.749, -84.388, name.to_string())
    }

    #[tokio::test]
    async fn test_stale_token_results_are_dropped() {
        let server = MockServer::start().await;
        let session = session_for(&server);

        let old = session.begin_refresh(somewhere("old")).await;
        let new = session.begin_refresh(somewhere("new")).await;

        let mut stale = ForecastBundle::default();
        stale.alerts = vec![
            serde_json::from_str(
                r#"{"geometry": null, "properties": {"event": "Stale Warning"}}"#,
            )
            .unwrap(),
        ];
        session.apply_bundle(old, stale).await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.location.unwrap().display_name, "new");
        assert!(snapshot.bundle.alerts.is_empty());
        assert!(snapshot.updated_at.is_none());

        let mut fresh = ForecastBundle::default();
        fresh.alerts = vec![
            serde_json::from_str(
                r#"{"geometry": null, "properties": {"event": "Fresh Warning"}}"#,
            )
            .unwrap(),
        ];
        session.apply_bundle(new, fresh).await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.bundle.alerts.len(), 1);
        assert!(snapshot.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_stale_sun_results_are_dropped() {
        let server = MockServer::start().await;
        let session = session_for(&server);

        let old = session.begin_refresh(somewhere("old")).await;
        let _new = session.begin_refresh(somewhere("new")).await;

        let mut map = SunriseSunsetMap::new();
        map.insert(
            "2026-08-29".to_string(),
            crate::sun::SunTimes {
                sunrise: "6:32".into(),
                sunset: "7:45".into(),
            },
        );
        session.apply_sun(old, map).await;

        assert!(session.snapshot().await.sun.is_empty());
    }

    #[tokio::test]
    async fn test_begin_refresh_clears_previous_sections() {
        let server = MockServer::start().await;
        let session = session_for(&server);

        let token = session.begin_refresh(somewhere("first")).await;
        let mut bundle = ForecastBundle::default();
        bundle.alerts = vec![
            serde_json::from_str(r#"{"geometry": null, "properties": {"event": "Old"}}"#).unwrap(),
        ];
        session.apply_bundle(token, bundle).await;
        assert_eq!(session.snapshot().await.bundle.alerts.len(), 1);

        session.begin_refresh(somewhere("second")).await;
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.location.unwrap().display_name, "second");
        assert!(snapshot.bundle.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_superseding_refresh_wins() {
        let server = MockServer::start().await;

        // Slow down the first refresh's upstream so the second overtakes it.
        Mock::given(method("GET"))
            .and(path_regex(r"^/points/.*"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(250))
                    .set_body_raw(
                        r#"{"properties": {"forecast": "http://invalid.invalid/f",
                             "forecastHourly": "http://invalid.invalid/h",
                             "observationStations": "http://invalid.invalid/s"}}"#,
                        "application/json",
                    ),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/alerts/active$"))
            .and(query_param("point", "33.749,-84.388"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"features": [{"geometry": null, "properties": {"event": "Heat Advisory"}}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/json$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"results": []}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let session = session_for(&server);
        session.refresh(somewhere("slow")).await;
        session.refresh(somewhere("fast")).await;
        session.wait_for_refresh().await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.location.unwrap().display_name, "fast");
    }
}
