use crate::AppState;
use crate::download::{
    DownloadOutcome, ResponseDelivery, SaveEnvironment, download_file,
};
use crate::services::api_client::ClientError;
use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portal_core::error::AppError;
use std::sync::Arc;

/// Show one document's content inline.
pub async fn view_document_content(
    State(state): State<AppState>,
    Path((api_id, document_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let file = state
        .api_client
        .get_document_content(&api_id, &document_id)
        .await
        .map_err(client_error)?;

    Ok((
        StatusCode::OK,
        [("content-type", file.content_type)],
        file.body,
    )
        .into_response())
}

/// Download one document's content as a file.
pub async fn download_document(
    State(state): State<AppState>,
    Path((api_id, document_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    tracing::info!(
        api_id = %api_id,
        document_id = %document_id,
        "document download request"
    );

    let file = state
        .api_client
        .get_document_content(&api_id, &document_id)
        .await
        .map_err(client_error)?;

    let delivery = Arc::new(ResponseDelivery::new());
    let env: Arc<dyn SaveEnvironment> = delivery.clone();
    download_file(file, &env);

    match delivery.take_outcome() {
        Some(DownloadOutcome::Attachment { filename, blob }) => Ok((
            StatusCode::OK,
            [
                ("content-type", blob.content_type),
                (
                    "content-disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            blob.bytes,
        )
            .into_response()),
        Some(DownloadOutcome::Inline { blob }) => Ok((
            StatusCode::OK,
            [("content-type", blob.content_type)],
            blob.bytes,
        )
            .into_response()),
        None => Err(AppError::InternalError(anyhow!(
            "download produced no deliverable outcome"
        ))),
    }
}

fn client_error(err: ClientError) -> AppError {
    match err {
        ClientError::NotFound => AppError::NotFound(anyhow!("document not found")),
        other => AppError::BadGateway(other.to_string()),
    }
}
