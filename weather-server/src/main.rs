//! Binary crate for the `weather-server` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Wiring providers into the HTTP router
//! - Logging and graceful shutdown

use clap::Parser;

mod cli;
mod routes;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    telemetry::init(cmd.verbose);
    cmd.run().await
}
