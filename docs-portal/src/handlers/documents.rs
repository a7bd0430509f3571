use crate::AppState;
use crate::models::{ApiSummary, DocumentSummary};
use crate::notify::Toasts;
use crate::view::{DocumentCatalog, DocumentListView, Rendered};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Template)]
#[template(path = "pages/loading.html")]
pub struct LoadingTemplate {}

#[derive(Template)]
#[template(path = "pages/documents.html")]
pub struct DocumentsTemplate {
    pub api: ApiSummary,
    pub api_id: String,
    pub editor_open: bool,
    pub documents: Option<Vec<DocumentSummary>>,
    pub toasts: Vec<String>,
}

#[derive(Deserialize)]
pub struct EditorParams {
    #[serde(default)]
    pub adding: bool,
    #[serde(default)]
    pub updating: bool,
}

/// Render the documents tab of one API.
pub async fn documents_page(
    State(state): State<AppState>,
    Path(api_id): Path<String>,
    Query(params): Query<EditorParams>,
) -> Response {
    let toasts = Arc::new(Toasts::new());
    let client: Arc<dyn DocumentCatalog> = state.api_client.clone();
    let view = DocumentListView::new(api_id, client, toasts.clone());

    if params.adding {
        view.set_adding(true).await;
    }
    if params.updating {
        view.set_updating(true).await;
    }

    view.mount().await.settled().await;

    match view.render().await {
        Rendered::Loading => {
            // The view keeps showing the loading state when the API could
            // not be fetched; a 404 status is surfaced alongside it.
            let status = if view.not_found().await {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, LoadingTemplate {}).into_response()
        }
        Rendered::Page(page) => DocumentsTemplate {
            api_id: page.api.id.clone(),
            api: page.api,
            editor_open: page.editor_open,
            documents: page.documents,
            toasts: toasts.drain(),
        }
        .into_response(),
    }
}
