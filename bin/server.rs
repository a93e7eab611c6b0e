// Tip Time - Web Server
// GET/POST /api/tip over axum

use anyhow::{Context, Result};
use std::path::PathBuf;
use tip_time::{api, AppConfig, TipCalculator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Optional first argument: config file path
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    let calculator = TipCalculator::from_config(&config).context("Invalid locale")?;
    info!(
        locale = calculator.currency_format().locale,
        empty_tip = calculator.empty_tip_policy().name(),
        "Tip calculator ready"
    );

    let app = api::router(calculator);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("API: http://{}/api/tip?amount=50&tip=15", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
