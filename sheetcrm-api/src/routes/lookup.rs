//! Caller lookup endpoint
//!
//! `GET /?spreadsheetID=...&phone=...` answers with the caller's name as a
//! plain-text body, or a short plain-text error.

use std::sync::Arc;

use axum::extract::{Query, State};
use serde::Deserialize;
use sheetcrm_core::QueryParams;
use utoipa::IntoParams;

use crate::error::ApiResult;
use crate::services::QueryHandler;

/// Query parameters accepted by the lookup endpoint.
///
/// Parsing is lenient: the handler reads raw pairs and this type only
/// documents them.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// Spreadsheet to read (required)
    #[serde(rename = "spreadsheetID")]
    pub spreadsheet_id: String,

    /// Incoming caller number; only its trailing digits are compared (required)
    pub phone: String,

    /// A1-notation range, optionally prefixed with `SheetName!` (default `A2:B`)
    #[serde(rename = "cellsRange")]
    pub cells_range: Option<String>,

    /// Zero-based column holding the name (default 0)
    #[serde(rename = "nameCol")]
    pub name_col: Option<String>,

    /// Zero-based column holding the phone (default 1)
    #[serde(rename = "phoneCol")]
    pub phone_col: Option<String>,

    /// Number of trailing phone characters to compare (default 10)
    #[serde(rename = "phoneMask")]
    pub phone_mask: Option<String>,
}

/// GET / - Look up a caller by phone suffix
#[utoipa::path(
    get,
    path = "/",
    tag = "Lookup",
    params(LookupQuery),
    responses(
        (status = 200, description = "Name of the first matching row", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or malformed parameter, or a row too short for the requested columns", body = String, content_type = "text/plain"),
        (status = 404, description = "Sheet unreadable or empty, or no row matched", body = String, content_type = "text/plain"),
    ),
)]
pub async fn lookup(
    State(handler): State<Arc<QueryHandler>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<String> {
    let params = QueryParams::from_pairs(pairs);
    tracing::info!(params = ?params, "GET with params");
    handler.handle(&params).await
}
