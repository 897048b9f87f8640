//! SheetCRM Test Utilities
//!
//! Centralized test infrastructure for the SheetCRM workspace:
//! - In-memory spreadsheet clients
//! - Proptest generators for phones, names, ranges and sheets
//! - Test fixtures for common scenarios
//! - Custom assertions for lookup outcomes

pub use sheetcrm_core::{
    CellValue, LookupRequest, MatchResult, QueryParams, QueryValidator, SheetRow, SourceError,
    ValidationError,
};
pub use sheetcrm_sheets::{SheetsError, SheetsResult, SpreadsheetClient};

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// MOCK CLIENTS
// ============================================================================

/// Spreadsheet client that serves a fixed set of rows and records every fetch.
#[derive(Debug, Default)]
pub struct StaticSheetClient {
    rows: Vec<SheetRow>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticSheetClient {
    pub fn new(rows: Vec<SheetRow>) -> Self {
        Self {
            rows,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// `(spreadsheet_id, range)` pairs fetched so far, oldest first.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }
}

#[async_trait]
impl SpreadsheetClient for StaticSheetClient {
    async fn fetch(&self, spreadsheet_id: &str, range: &str) -> SheetsResult<Vec<SheetRow>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((spreadsheet_id.to_string(), range.to_string()));
        }
        Ok(self.rows.clone())
    }

    fn backend_name(&self) -> &str {
        "static"
    }
}

/// Spreadsheet client whose every fetch fails with the given error.
#[derive(Debug)]
pub struct FailingSheetClient {
    error: SheetsError,
    attempts: AtomicUsize,
}

impl FailingSheetClient {
    pub fn new(error: SheetsError) -> Self {
        Self {
            error,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Backend answering 404 for every spreadsheet.
    pub fn not_found() -> Self {
        Self::new(SheetsError::Status {
            status: 404,
            message: "Requested entity was not found.".to_string(),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpreadsheetClient for FailingSheetClient {
    async fn fetch(&self, _spreadsheet_id: &str, _range: &str) -> SheetsResult<Vec<SheetRow>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for lookup inputs.

    use super::*;
    use proptest::prelude::*;

    /// Digits-only phone number of 1 to 15 characters.
    pub fn arb_phone() -> impl Strategy<Value = String> {
        "[0-9]{1,15}"
    }

    /// Phone number with common formatting characters.
    pub fn arb_formatted_phone() -> impl Strategy<Value = String> {
        "\\+?[0-9]{1,3}[ -]?\\(?[0-9]{3}\\)?[ -]?[0-9]{3}-?[0-9]{4}"
    }

    /// Capitalized contact name.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,12}( [A-Z][a-z]{1,12})?"
    }

    /// Range accepted by the validator.
    pub fn arb_valid_cells_range() -> impl Strategy<Value = String> {
        (
            proptest::option::of("[A-Za-z][A-Za-z0-9 ]{0,15}"),
            "[A-Z]{1,3}",
            1u32..10_000,
            "[A-Z]{1,3}",
            proptest::option::of(1u32..10_000),
        )
            .prop_map(|(sheet, start_col, start_row, end_col, end_row)| {
                let prefix = sheet.map(|name| format!("{}!", name)).unwrap_or_default();
                let end_row = end_row.map(|row| row.to_string()).unwrap_or_default();
                format!("{}{}{}:{}{}", prefix, start_col, start_row, end_col, end_row)
            })
    }

    /// Range rejected by the validator.
    pub fn arb_invalid_cells_range() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Z]{1,3}[0-9]{1,4}".boxed(),
            "[a-z]{1,3}[0-9]{1,4}:[a-z]{1,3}".boxed(),
            "[A-Z]{1,3}:[A-Z]{1,3}".boxed(),
            "[A-Z]{1,3}[0-9]{1,4}:[a-z]{1,3}".boxed(),
            "[0-9]{1,6}".boxed(),
        ]
    }

    /// A two-column (name, phone) row.
    pub fn arb_contact_row() -> impl Strategy<Value = SheetRow> {
        (arb_name(), arb_phone()).prop_map(|(name, phone)| fixtures::contact_row(&name, &phone))
    }

    /// A sheet of two-column rows.
    pub fn arb_contact_sheet(max_rows: usize) -> impl Strategy<Value = Vec<SheetRow>> {
        prop::collection::vec(arb_contact_row(), 0..=max_rows)
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Spreadsheet identifier used across tests.
    pub const SPREADSHEET_ID: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";

    pub fn contact_row(name: &str, phone: &str) -> SheetRow {
        [name, phone].into_iter().collect()
    }

    /// Build rows from string cells.
    pub fn rows(data: &[&[&str]]) -> Vec<SheetRow> {
        data.iter()
            .map(|cells| cells.iter().copied().collect())
            .collect()
    }

    /// Alice and Bob, name in column 0, phone in column 1.
    pub fn sample_rows() -> Vec<SheetRow> {
        rows(&[&["Alice", "5551234567"], &["Bob", "5559876543"]])
    }

    /// Lookup parameters with a spreadsheet and phone set.
    pub fn lookup_params(phone: &str) -> QueryParams {
        QueryParams::new()
            .with("spreadsheetID", SPREADSHEET_ID)
            .with("phone", phone)
    }

    /// Query string for the lookup endpoint with the given extra pairs.
    pub fn lookup_uri(pairs: &[(&str, &str)]) -> String {
        let query: Vec<String> = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("/?{}", query.join("&"))
    }

    pub fn validator() -> QueryValidator {
        match QueryValidator::new() {
            Ok(validator) => validator,
            Err(e) => panic!("range pattern failed to compile: {}", e),
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions for lookup outcomes.

    use super::*;

    /// Assert that a lookup found `expected`.
    pub fn assert_found(result: &MatchResult, expected: &str) {
        match result {
            MatchResult::Found { name } => assert_eq!(name, expected),
            other => panic!("Expected Found({}), got {:?}", expected, other),
        }
    }

    pub fn assert_not_found(result: &MatchResult) {
        assert!(
            matches!(result, MatchResult::NotFound),
            "Expected NotFound, got {:?}",
            result
        );
    }

    pub fn assert_validation_error(result: &MatchResult, expected: ValidationError) {
        match result {
            MatchResult::ValidationError(err) => assert_eq!(*err, expected),
            other => panic!("Expected ValidationError({:?}), got {:?}", expected, other),
        }
    }

    pub fn assert_source_error(result: &MatchResult) {
        assert!(
            matches!(result, MatchResult::SourceError(_)),
            "Expected SourceError, got {:?}",
            result
        );
    }
}
