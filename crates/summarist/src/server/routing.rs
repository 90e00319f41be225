//! Axum router configuration for all endpoints

use axum::{
  middleware::from_fn_with_state,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{logs, page, records, status, summaries};
use crate::server::middleware::request_context;
use crate::server::AppState;

/// Create the application router over shared state
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Form page
    .route("/", get(page::index))
    // Summary and record endpoints
    .route("/summaries", post(summaries::create_summary))
    .route("/records/export", post(records::export_records))
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    // Logs endpoint
    .route("/logs", get(logs::get_logs))
    .layer(from_fn_with_state(state.clone(), request_context))
    .with_state(state)
}
