//! Lookup Service
//!
//! Orchestrates one caller lookup: validate the query, fetch the sheet once,
//! match the first row and turn the outcome into a response body.

use std::sync::Arc;
use std::time::Instant;

use sheetcrm_core::{match_request, MatchResult, QueryParams, QueryValidator, SourceError};
use sheetcrm_sheets::SpreadsheetClient;

use crate::error::{ApiError, ApiResult};
use crate::telemetry::METRICS;

/// How a found name is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseOptions {
    /// Answer `Hello <name>` instead of the bare name.
    pub greeting: bool,
}

impl ResponseOptions {
    pub fn render(&self, name: &str) -> String {
        if self.greeting {
            format!("Hello {}", name)
        } else {
            name.to_string()
        }
    }
}

/// Handles lookups against one spreadsheet source.
///
/// Holds no per-request state; a single instance is shared by all requests.
pub struct QueryHandler {
    client: Arc<dyn SpreadsheetClient>,
    validator: QueryValidator,
    options: ResponseOptions,
}

impl QueryHandler {
    pub fn new(
        client: Arc<dyn SpreadsheetClient>,
        validator: QueryValidator,
        options: ResponseOptions,
    ) -> Self {
        Self {
            client,
            validator,
            options,
        }
    }

    pub fn options(&self) -> ResponseOptions {
        self.options
    }

    /// Run a lookup and classify its outcome.
    ///
    /// Invalid queries never reach the spreadsheet. Valid ones fetch it exactly
    /// once; a failed fetch is not retried.
    pub async fn lookup(&self, params: &QueryParams) -> MatchResult {
        let request = match self.validator.validate(params) {
            Ok(request) => request,
            Err(err) => {
                tracing::info!(error = %err, "Rejected lookup query");
                return err.into();
            }
        };

        tracing::debug!(
            spreadsheet_id = request.spreadsheet_id(),
            range = request.cells_range(),
            suffix = %request.normalized_phone(),
            "Fetching spreadsheet range"
        );

        let start = Instant::now();
        let fetched = self
            .client
            .fetch(request.spreadsheet_id(), request.cells_range())
            .await;
        if let Ok(metrics) = METRICS.as_ref() {
            metrics.record_sheet_fetch(fetched.is_ok(), start.elapsed().as_secs_f64());
        }

        let rows = match fetched {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(
                    backend = self.client.backend_name(),
                    spreadsheet_id = request.spreadsheet_id(),
                    error = %err,
                    "Unable to retrieve data from sheet"
                );
                return SourceError::from(err).into();
            }
        };

        if rows.is_empty() {
            tracing::info!(
                spreadsheet_id = request.spreadsheet_id(),
                range = request.cells_range(),
                "No data found"
            );
            return SourceError::EmptyData.into();
        }

        match_request(&rows, &request)
    }

    /// Map an outcome to the response body, or the error to answer with.
    pub fn respond(&self, result: MatchResult) -> ApiResult<String> {
        match result {
            MatchResult::Found { name } => Ok(self.options.render(&name)),
            MatchResult::NotFound => Err(ApiError::not_found()),
            MatchResult::ValidationError(err) => Err(err.into()),
            MatchResult::SourceError(err) => Err(err.into()),
        }
    }

    /// Lookup, count the outcome, then respond.
    pub async fn handle(&self, params: &QueryParams) -> ApiResult<String> {
        let result = self.lookup(params).await;
        if let Ok(metrics) = METRICS.as_ref() {
            metrics.record_lookup(result.outcome_label());
        }
        self.respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use sheetcrm_core::{ValidationError, DEFAULT_CELLS_RANGE};
    use sheetcrm_test_utils::assertions::*;
    use sheetcrm_test_utils::fixtures::{self, SPREADSHEET_ID};
    use sheetcrm_test_utils::{FailingSheetClient, StaticSheetClient};

    fn handler_with(client: Arc<dyn SpreadsheetClient>, greeting: bool) -> QueryHandler {
        QueryHandler::new(client, fixtures::validator(), ResponseOptions { greeting })
    }

    #[tokio::test]
    async fn test_lookup_finds_first_match() {
        let client = Arc::new(StaticSheetClient::new(fixtures::sample_rows()));
        let handler = handler_with(client.clone(), false);

        let result = handler.lookup(&fixtures::lookup_params("4567")).await;
        assert_found(&result, "Alice");
        assert_eq!(
            client.calls(),
            vec![(SPREADSHEET_ID.to_string(), DEFAULT_CELLS_RANGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_invalid_query_skips_fetch() {
        let client = Arc::new(StaticSheetClient::new(fixtures::sample_rows()));
        let handler = handler_with(client.clone(), false);

        let params = QueryParams::new().with("phone", "4567");
        let result = handler.lookup(&params).await;
        assert_validation_error(&result, ValidationError::MissingSpreadsheetId);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_sheet_is_source_error() {
        let handler = handler_with(Arc::new(StaticSheetClient::empty()), false);
        let result = handler.lookup(&fixtures::lookup_params("4567")).await;
        assert_eq!(result, MatchResult::SourceError(SourceError::EmptyData));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_retried() {
        let client = Arc::new(FailingSheetClient::not_found());
        let handler = handler_with(client.clone(), false);

        let result = handler.lookup(&fixtures::lookup_params("4567")).await;
        assert_source_error(&result);
        assert_eq!(client.attempts(), 1);
    }

    #[tokio::test]
    async fn test_handle_renders_greeting() {
        let handler = handler_with(Arc::new(StaticSheetClient::new(fixtures::sample_rows())), true);
        let body = handler.handle(&fixtures::lookup_params("9876543")).await;
        assert_eq!(body, Ok("Hello Bob".to_string()));
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let handler = handler_with(Arc::new(StaticSheetClient::new(fixtures::sample_rows())), false);
        let err = handler
            .handle(&fixtures::lookup_params("0000"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Not found");
    }

    #[test]
    fn test_respond_maps_every_outcome() {
        let handler = handler_with(Arc::new(StaticSheetClient::empty()), false);

        assert_eq!(handler.respond(MatchResult::found("Alice")), Ok("Alice".to_string()));
        assert_eq!(
            handler.respond(ValidationError::InvalidNameColumn.into()).unwrap_err().message,
            "Invalid number of name column"
        );
        assert_eq!(
            handler
                .respond(SourceError::unavailable("timeout").into())
                .unwrap_err()
                .message,
            "Empty data"
        );
    }
}
