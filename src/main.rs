//! Quake Drill · Earthquake preparedness scenario backend
//!
//! - Axum HTTP + WebSocket API over a branching scenario engine
//! - Scenario catalog loaded once from a JSON file (empty catalog if missing)
//! - Static frontend fallback (<static_dir>/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   DRILL_CONFIG_PATH : path to TOML config (scenario path, static dir, scoring overrides)
//!   SCENARIOS_PATH    : scenario file, overrides the config (default "data/scenarios.json")
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod error;
mod domain;
mod config;
mod catalog;
mod lessons;
mod engine;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Catalog + the single shared engine session.
  let config = AppConfig::from_env();
  let state = Arc::new(AppState::new(config));

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quake_drill", %addr, scenarios = state.catalog.len(), "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "quake_drill", error = %e, "Failed to listen for ctrl-c; running until killed");
    std::future::pending::<()>().await;
  }
  info!(target: "quake_drill", "Shutdown requested");
}
