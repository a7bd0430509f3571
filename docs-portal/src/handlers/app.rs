use askama::Template;
use axum::response::IntoResponse;

/// Portal landing page; the per-API document views hang off `/apis/:api_id`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

pub async fn index() -> impl IntoResponse {
    IndexTemplate {}
}

/// Liveness probe for the documents portal.
pub async fn health_check() -> &'static str {
    "OK"
}
