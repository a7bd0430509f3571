use axum::{Router, middleware::from_fn, routing::get};
use portal_core::middleware::tracing::request_id_middleware;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::handlers::{
    app::{health_check, index},
    documents::documents_page,
    download::{download_document, view_document_content},
    metrics::metrics,
};
use crate::middleware::metrics::metrics_middleware;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/apis/:api_id/documents", get(documents_page))
        .route(
            "/apis/:api_id/documents/:document_id",
            get(view_document_content),
        )
        .route(
            "/apis/:api_id/documents/:document_id/download",
            get(download_document),
        )
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
