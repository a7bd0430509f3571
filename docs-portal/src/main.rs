use docs_portal::AppState;
use docs_portal::config::get_configuration;
use docs_portal::services::api_client::ApiClient;
use docs_portal::startup::build_router;
use dotenvy::dotenv;
use portal_core::observability::logging::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "docs-portal",
        &configuration.observability.log_level,
        configuration.observability.otlp_endpoint.as_deref(),
    );

    docs_portal::services::metrics::init_metrics();

    let api_client = Arc::new(ApiClient::new(configuration.backend.clone())?);

    let app = build_router(AppState::new(api_client));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting docs-portal on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
