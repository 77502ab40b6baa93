use anyhow::Result;
use skywatch::SkywatchConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &SkywatchConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkywatchConfig::load()?;
    init_tracing(&config);

    tracing::info!(version = skywatch::VERSION, "Starting skywatch");
    skywatch::web::run(&config).await
}
