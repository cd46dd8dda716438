//! Market Pulse API Server
//!
//! Serves snapshots, dashboards and narrated verdicts over HTTP, plus
//! health and Prometheus metrics. Stateless between requests.

use dotenvy::dotenv;
use market_pulse::config::AppConfig;
use market_pulse::core::http::start_server;
use market_pulse::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = AppConfig::from_env()?;
    let providers: Vec<&str> = config
        .pipeline
        .providers
        .iter()
        .map(|p| p.kind.as_str())
        .collect();

    info!("Starting Market Pulse API Server");
    info!(environment = %config.environment, "Environment");
    info!(providers = ?providers, timeframe = %config.pipeline.default_timeframe, "Market data");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(&config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
