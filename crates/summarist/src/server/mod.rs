//! REST API and form page for the summarizer
//!
//! Uses axum for routing and schemars for the request/response types.
//! Every route shares one [`AppState`] holding the service and the activity log.

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

use chronicle::activity::ActivityLog;

use crate::config::Settings;
use crate::errors::Result;
use crate::service::SummaryService;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
  pub service: SummaryService,
  pub logs: ActivityLog,
  /// Model name reported by /status
  pub model: String,
}

impl AppState {
  pub fn new(service: SummaryService, logs: ActivityLog, model: impl Into<String>) -> Self {
    Self { service, logs, model: model.into() }
  }

  pub fn from_settings(settings: &Settings, logs: ActivityLog) -> Result<Self> {
    let service = SummaryService::from_settings(settings)?;
    Ok(Self::new(service, logs, settings.generation.model.clone()))
  }
}
