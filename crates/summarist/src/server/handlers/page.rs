//! The form page

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// GET / - Notes form with the three actions and the gated download
pub async fn index() -> Html<&'static str> {
  Html(INDEX_HTML)
}
