pub mod config;
pub mod download;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod services;
pub mod startup;
pub mod view;

use services::api_client::ApiClient;
use std::sync::Arc;

/// Shared application state: one backend client reused by every request.
#[derive(Clone)]
pub struct AppState {
    pub api_client: Arc<ApiClient>,
}

impl AppState {
    pub fn new(api_client: Arc<ApiClient>) -> Self {
        Self { api_client }
    }
}
