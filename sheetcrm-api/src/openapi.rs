//! OpenAPI Specification for the SheetCRM API
//!
//! Generated by utoipa from the route annotations.

use utoipa::OpenApi;

use crate::routes::{health, lookup};
use crate::telemetry::metrics;

/// OpenAPI document for the SheetCRM API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SheetCRM API",
        version = "0.1.0",
        description = "Caller name lookup by phone suffix against a Google Sheets contact list",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Lookup", description = "Caller name lookup"),
        (name = "Health", description = "Health check endpoints"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        lookup::lookup,
        health::ping,
        health::liveness,
        metrics::metrics_handler,
    ),
    components(schemas(
        health::HealthResponse,
        health::HealthStatus,
        health::HealthDetails,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Get the OpenAPI specification as a pretty JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
