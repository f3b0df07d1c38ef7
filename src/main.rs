//! Answer Evaluation Console
//!
//! - Axum HTTP + WebSocket front end for an external answer-scoring service
//! - Per-connection view state: form, connectivity, alerts, presented results
//! - Static page fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   EVAL_API_BASE_URL   : scoring service, default "http://localhost:8000"
//!   STATIC_DIR          : page assets, default "./static"
//!   CONSOLE_CONFIG_PATH : path to TOML config (service/server/sample)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod seeds;
mod form;
mod connectivity;
mod presenter;
mod state;
mod view;
mod protocol;
mod client;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Settings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

  let state = Arc::new(AppState::new(settings)?);
  let app = build_router(state.clone());

  let listener = TcpListener::bind(addr).await?;
  info!(target: "answer_eval_console", %addr, scoring_service = %state.client.base_url(), "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "answer_eval_console", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "answer_eval_console", error = %e, "Could not install Ctrl-C handler");
    std::future::pending::<()>().await;
  }
  info!(target: "answer_eval_console", "Shutdown requested");
}
