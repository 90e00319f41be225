//! Request context and middleware
//!
//! Every request gets a [`RequestContext`] carrying its id and the shared
//! activity log, so handlers can log with request metadata attached.

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use chronicle::activity::{ActivityLog, LogContext};
use chronicle::Level;
use std::time::Instant;
use uuid::Uuid;

use crate::server::AppState;

/// Request metadata plus the logger, injected as a request extension
#[derive(Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: String,
  pub path: String,
  pub user_agent: Option<String>,
  pub logs: ActivityLog,
}

impl RequestContext {
  pub fn new(request: &Request, logs: ActivityLog) -> Self {
    let user_agent = request
      .headers()
      .get(axum::http::header::USER_AGENT)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);

    Self {
      request_id: Uuid::new_v4(),
      method: request.method().to_string(),
      path: request.uri().path().to_string(),
      user_agent,
      logs,
    }
  }

  fn log_context(&self) -> LogContext {
    LogContext {
      request_id: Some(self.request_id.to_string()),
      method: Some(self.method.clone()),
      path: Some(self.path.clone()),
      user_agent: self.user_agent.clone(),
      ..Default::default()
    }
  }

  pub async fn log(&self, level: Level, message: &str, component: &str) {
    self.logs.log(level, message, component, Some(self.log_context())).await;
  }

  pub async fn log_info(&self, message: &str, component: &str) {
    self.log(Level::Info, message, component).await;
  }

  pub async fn log_success(&self, message: &str, component: &str) {
    self.log(Level::Success, message, component).await;
  }

  pub async fn log_warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, message, component).await;
  }

  pub async fn log_error(&self, message: &str, component: &str) {
    self.log(Level::Error, message, component).await;
  }

  async fn log_complete(&self, status_code: u16, duration_ms: f64) {
    let context = LogContext {
      status_code: Some(status_code),
      duration_ms: Some(duration_ms),
      ..self.log_context()
    };
    let level = if status_code >= 500 { Level::Error } else { Level::Info };
    self.logs.log(level, "Request completed", "http-request", Some(context)).await;
  }
}

/// Attach a [`RequestContext`] and log request start and completion
pub async fn request_context(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(&request, state.logs.clone());

  let started = Instant::now();
  context.log(Level::Debug, "Request started", "http-request").await;

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
  context.log_complete(response.status().as_u16(), duration_ms).await;

  response
}
