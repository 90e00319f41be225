//! REST server startup and configuration

use anyhow::{Context, Result};
use axum::serve;
use chronicle::activity::ActivityLog;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::server::routing::create_router;
use crate::server::AppState;

/// Start the server and run until ctrl-c
pub async fn start_server(settings: &Settings) -> Result<()> {
  let logs = ActivityLog::open_with_silent(settings.logs.resolved_path(), settings.logs.silent)
    .context("Failed to open the activity log")?;

  let addr = settings.server.bind;
  logs.info(&format!("Starting summarist server on {addr}"), "summarist-server").await;

  let state = AppState::from_settings(settings, logs.clone())?;
  state.service.store().ensure_initialized()?;
  logs
    .info(&format!("Recording summaries to {}", state.service.store().path().display()), "summarist-server")
    .await;

  let app = create_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

  let listener = TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;
  logs.info(&format!("Server listening on http://{addr}"), "summarist-server").await;

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      logs.info("Server shutdown gracefully", "summarist-server").await;
      Ok(())
    }
    Err(e) => {
      logs.error(&format!("Server error: {e}"), "summarist-server").await;
      Err(anyhow::anyhow!("Server error: {e}"))
    }
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    chronicle::warn!("Failed to listen for shutdown signal: {e}");
  }
}
