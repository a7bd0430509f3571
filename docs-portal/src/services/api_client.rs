//! REST client for the API-manager backend.
//!
//! One instance is constructed at startup and shared by every request; the
//! view receives it through the `DocumentCatalog` trait.

use crate::config::BackendSettings;
use crate::download::FileResponse;
use crate::models::{ApiSummary, DocumentListResponse, DocumentSummary};
use crate::view::DocumentCatalog;
use anyhow::Result;
use async_trait::async_trait;
use portal_core::observability::TracedClientExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Failure kinds surfaced by backend calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found")]
    NotFound,

    /// Structured error payload returned by the backend.
    #[error("Error[{code}]: {description} | {message}.")]
    Api {
        code: i64,
        description: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response ({status}): {body}")]
    Unexpected { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    description: String,
    message: String,
}

pub struct ApiClient {
    client: Client,
    settings: BackendSettings,
}

impl ApiClient {
    pub fn new(settings: BackendSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { client, settings })
    }

    /// Fetch the API summary for `api_id`.
    pub async fn get_api(&self, api_id: &str) -> Result<ApiSummary, ClientError> {
        let url = format!("{}/apis/{}", self.settings.url, api_id);

        let response = self.client.traced_get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json::<ApiSummary>().await?)
    }

    /// Fetch the documents attached to `api_id`, in backend order.
    pub async fn get_documents(&self, api_id: &str) -> Result<Vec<DocumentSummary>, ClientError> {
        let url = format!("{}/apis/{}/documents", self.settings.url, api_id);

        let response = self.client.traced_get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json::<DocumentListResponse>().await?.list)
    }

    /// Fetch the raw content of one document (headers + body bytes).
    pub async fn get_document_content(
        &self,
        api_id: &str,
        document_id: &str,
    ) -> Result<FileResponse, ClientError> {
        let url = format!(
            "{}/apis/{}/documents/{}/content",
            self.settings.url, api_id, document_id
        );

        let response = self.client.traced_get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        FileResponse::from_response(response).await
    }

    async fn error_from_response(response: reqwest::Response) -> ClientError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return ClientError::NotFound;
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => ClientError::Api {
                code: err.code,
                description: err.description,
                message: err.message,
            },
            Err(_) => ClientError::Unexpected { status, body },
        }
    }
}

#[async_trait]
impl DocumentCatalog for ApiClient {
    async fn get_api(&self, api_id: &str) -> Result<ApiSummary, ClientError> {
        ApiClient::get_api(self, api_id).await
    }

    async fn get_documents(&self, api_id: &str) -> Result<Vec<DocumentSummary>, ClientError> {
        ApiClient::get_documents(self, api_id).await
    }
}
