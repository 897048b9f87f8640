//! SheetCRM API - HTTP Caller Lookup
//!
//! Serves `GET /?spreadsheetID=...&phone=...`, answering with the name of the
//! first spreadsheet row whose phone cell ends with the caller's number.
//!
//! Alongside the lookup route the router exposes health checks, Prometheus
//! metrics and an OpenAPI document.

#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use server::{serve_with_shutdown, shutdown_signal};
pub use services::{QueryHandler, ResponseOptions};
pub use state::AppState;
