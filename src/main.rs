//! Codequiz · coding challenge backend
//!
//! - Axum HTTP API serving multiple-choice coding challenges
//! - Challenges generated by Gemini, with a built-in fallback record
//!
//! Important env variables (a local `.env` file is loaded first if present):
//!   PORT                  : u16 (default 8000)
//!   GOOGLE_API_KEY        : enables Gemini if present
//!   GEMINI_BASE_URL       : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL          : default "gemini-2.5-flash-lite-preview-06-17"
//!   GEMINI_TIMEOUT_SECS   : request timeout, default 30
//!   CHALLENGE_CONFIG_PATH : path to TOML config (prompt + model overrides)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use codequiz_backend::routes::build_router;
use codequiz_backend::state::AppState;
use codequiz_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let dotenv = dotenvy::dotenv();
  telemetry::init_tracing();
  match dotenv {
    Ok(path) => info!(target: "codequiz_backend", path = %path.display(), "Loaded .env"),
    Err(e) if e.not_found() => {}
    Err(e) => warn!(target: "codequiz_backend", error = %e, "Failed to load .env"),
  }

  let state = Arc::new(AppState::from_env());
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "codequiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "codequiz_backend", error = %e, "Failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  info!(target: "codequiz_backend", "Shutdown signal received");
}
