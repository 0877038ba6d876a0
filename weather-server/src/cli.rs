use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use weather_core::{Config, provider};

use crate::routes::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Current temperature by Brazilian zipcode")]
pub struct Cli {
    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long, env = "WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. "127.0.0.1:8080".
    #[arg(long, env = "WEATHER_LISTEN_ADDR")]
    pub listen: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load(self.config.as_deref())?.with_env();
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }

        let http = provider::http_client(config.request_timeout())
            .context("Failed to build HTTP client")?;
        let provider_id = config.default_provider_id()?;

        let state = AppState {
            location: provider::location_provider_from_config(&config, http.clone()),
            weather: provider::weather_provider_from_config(provider_id, &config, http),
        };

        let listener = TcpListener::bind(&config.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

        info!(
            addr = %config.listen_addr,
            provider = %provider_id,
            timeout = ?config.request_timeout(),
            "Starting weather server"
        );

        axum::serve(listener, routes::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("Weather server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
