//! SheetCRM API Server Entry Point
//!
//! Loads configuration, builds the Google Sheets client and serves the lookup
//! endpoint until SIGINT or SIGTERM.

use std::sync::Arc;

use sheetcrm_api::telemetry::{init_tracer, TelemetryConfig};
use sheetcrm_api::{
    create_api_router, serve_with_shutdown, shutdown_signal, ApiConfig, ApiError, ApiResult,
    AppState, QueryHandler, ResponseOptions,
};
use sheetcrm_core::QueryValidator;
use sheetcrm_sheets::{GoogleSheetsClient, SheetsConfig};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracer(&telemetry_config)?;

    tracing::info!("Starting the app...");

    let api_config = ApiConfig::from_env()?;
    let sheets_config = SheetsConfig::from_env()?;

    let client = GoogleSheetsClient::from_config(&sheets_config)?;
    let validator = QueryValidator::new()?;
    let handler = QueryHandler::new(
        Arc::new(client),
        validator,
        ResponseOptions {
            greeting: api_config.greeting,
        },
    );

    let app = create_api_router(AppState::new(handler), &api_config);

    let addr = api_config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!(%addr, greeting = api_config.greeting, "Listening");

    let result = serve_with_shutdown(
        listener,
        app,
        async {
            shutdown_signal().await;
            tracing::info!("Stopping app...");
        },
        api_config.shutdown_timeout,
    )
    .await;

    match &result {
        Ok(()) => tracing::info!("The app stopped"),
        Err(e) => tracing::error!(error = %e, "The app stopped with an error"),
    }
    result
}
