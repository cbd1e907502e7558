//! CrewTask API server.
//!
//! An axum server exposing the task, leave, team, and project APIs over
//! REST plus a WebSocket push channel at `/ws`. Identity comes from
//! HS256-signed bearer tokens minted by provisioning tooling.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3001
//! cargo run --bin crewtask-server
//!
//! # Run on custom address with a real secret
//! cargo run --bin crewtask-server -- --bind 127.0.0.1:8080 --token-secret $SECRET
//!
//! # Or via environment variables
//! CREWTASK_ADDR=127.0.0.1:8080 CREWTASK_TOKEN_SECRET=$SECRET cargo run --bin crewtask-server
//! ```

use std::sync::Arc;

use clap::Parser;
use crewtask_server::config::{CliArgs, ServerConfig};
use crewtask_server::server::{self, AppState};

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting crewtask server");
    if config.uses_default_secret() {
        tracing::warn!("running with the built-in token secret; set CREWTASK_TOKEN_SECRET");
    }

    let state = Arc::new(AppState::new(&config));

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "crewtask server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
