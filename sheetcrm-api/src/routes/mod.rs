//! REST API Routes Module
//!
//! Assembles the lookup endpoint with the health, metrics and OpenAPI routes
//! into a single Axum router.

pub mod health;
pub mod lookup;

use axum::{middleware::from_fn, response::IntoResponse, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Create the complete router.
///
/// Routes:
/// - `GET /` - caller lookup (any other method answers 405)
/// - `/health/*` - health checks
/// - `GET /metrics` - Prometheus scrape, unless disabled in config
/// - `GET /openapi.json` - OpenAPI document
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(lookup::lookup))
        .nest("/health", health::create_router())
        .route("/openapi.json", get(openapi_json));

    if config.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    router
        .layer(from_fn(observability_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
