//! Web server bootstrap: CORS, the JSON API and the static dashboard assets

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::SkywatchConfig;
use crate::geocode::GeocodingClient;
use crate::nws::NwsClient;
use crate::pipeline::ForecastPipeline;
use crate::session::DashboardSession;
use crate::sun::SunClient;

/// Build the application router from configuration
pub fn app(config: &SkywatchConfig) -> Result<Router> {
    let nws = NwsClient::new(&config.upstream)?;
    let state = AppState {
        session: DashboardSession::new(
            ForecastPipeline::new(nws.clone()),
            SunClient::new(&config.upstream)?,
        ),
        geocoder: GeocodingClient::new(&config.upstream)?,
        nws,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(cors))
}

/// Bind and serve until shutdown
pub async fn run(config: &SkywatchConfig) -> Result<()> {
    let app = app(config)?;

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Dashboard running at http://localhost:{}", config.server.port);
    axum::serve(listener, app)
        .await
        .with_context(|| "Server stopped unexpectedly")?;
    Ok(())
}
