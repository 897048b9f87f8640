//! Lookup data model: raw query parameters, resolved requests, sheet rows and
//! match outcomes.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::{SourceError, ValidationError};
use crate::normalizer::normalize;

// ============================================================================
// DEFAULTS AND PARAMETER NAMES
// ============================================================================

/// Range fetched when the request does not name one.
pub const DEFAULT_CELLS_RANGE: &str = "A2:B";

/// Column holding the contact name when `nameCol` is absent.
pub const DEFAULT_NAME_COLUMN: usize = 0;

/// Column holding the phone number when `phoneCol` is absent.
pub const DEFAULT_PHONE_COLUMN: usize = 1;

/// Number of trailing phone characters compared when `phoneMask` is absent.
pub const DEFAULT_PHONE_SUFFIX_LENGTH: usize = 10;

/// Query parameter names accepted by the lookup endpoint.
pub mod param {
    pub const SPREADSHEET_ID: &str = "spreadsheetID";
    pub const CELLS_RANGE: &str = "cellsRange";
    pub const PHONE: &str = "phone";
    pub const NAME_COLUMN: &str = "nameCol";
    pub const PHONE_COLUMN: &str = "phoneCol";
    pub const PHONE_MASK: &str = "phoneMask";
}

// ============================================================================
// QUERY PARAMS
// ============================================================================

/// Raw, untrusted query parameters keyed by name.
///
/// When a name appears more than once the first value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `(name, value)` pairs in query-string order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (name, value) in pairs {
            values.entry(name.into()).or_insert_with(|| value.into());
        }
        Self { values }
    }

    /// Value of `name`, treating an empty value the same as an absent one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// LOOKUP REQUEST
// ============================================================================

/// A fully resolved lookup request.
///
/// Every field has its default applied and the suffix length is clamped to the
/// phone's character count. Only [`crate::QueryValidator`] constructs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    spreadsheet_id: String,
    cells_range: String,
    phone: String,
    name_column: usize,
    phone_column: usize,
    phone_suffix_length: usize,
}

impl LookupRequest {
    pub(crate) fn new(
        spreadsheet_id: String,
        cells_range: String,
        phone: String,
        name_column: usize,
        phone_column: usize,
        phone_suffix_length: usize,
    ) -> Self {
        Self {
            spreadsheet_id,
            cells_range,
            phone,
            name_column,
            phone_column,
            phone_suffix_length,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn cells_range(&self) -> &str {
        &self.cells_range
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn name_column(&self) -> usize {
        self.name_column
    }

    pub fn phone_column(&self) -> usize {
        self.phone_column
    }

    pub fn phone_suffix_length(&self) -> usize {
        self.phone_suffix_length
    }

    /// The trailing part of the phone number compared against sheet cells.
    pub fn normalized_phone(&self) -> String {
        normalize(&self.phone, self.phone_suffix_length)
    }
}

// ============================================================================
// SHEET ROWS
// ============================================================================

/// A single spreadsheet cell as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum CellValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// Render the cell the way it is compared and returned.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => {
                if let Some(value) = number.as_i64() {
                    write!(f, "{}", value)
                } else if let Some(value) = number.as_u64() {
                    write!(f, "{}", value)
                } else if let Some(value) = number.as_f64() {
                    // f64 Display drops the fractional part of integral values.
                    write!(f, "{}", value)
                } else {
                    write!(f, "{}", number)
                }
            }
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => CellValue::Number(n),
            serde_json::Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

/// One fetched spreadsheet row. Rows may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SheetRow {
    cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Display string of the cell at `index`, if the row is long enough.
    pub fn display_at(&self, index: usize) -> Option<String> {
        self.cells.get(index).map(CellValue::display)
    }
}

impl From<Vec<CellValue>> for SheetRow {
    fn from(cells: Vec<CellValue>) -> Self {
        Self::new(cells)
    }
}

impl<T: Into<CellValue>> FromIterator<T> for SheetRow {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// MATCH RESULT
// ============================================================================

/// Outcome of a single lookup. Exactly one variant is ever produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Found { name: String },
    NotFound,
    ValidationError(ValidationError),
    SourceError(SourceError),
}

impl MatchResult {
    pub fn found(name: impl Into<String>) -> Self {
        MatchResult::Found { name: name.into() }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }

    /// Short label used for logs and metrics.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            MatchResult::Found { .. } => "found",
            MatchResult::NotFound => "not_found",
            MatchResult::ValidationError(_) => "invalid",
            MatchResult::SourceError(_) => "source_error",
        }
    }
}

impl From<ValidationError> for MatchResult {
    fn from(err: ValidationError) -> Self {
        MatchResult::ValidationError(err)
    }
}

impl From<SourceError> for MatchResult {
    fn from(err: SourceError) -> Self {
        MatchResult::SourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params_first_value_wins() {
        let params = QueryParams::from_pairs(vec![
            ("phone", "111"),
            ("phone", "222"),
            ("spreadsheetID", "abc"),
        ]);
        assert_eq!(params.get("phone"), Some("111"));
        assert_eq!(params.get("spreadsheetID"), Some("abc"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_query_params_empty_value_is_absent() {
        let params = QueryParams::new().with("cellsRange", "");
        assert_eq!(params.get("cellsRange"), None);
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_cell_display_variants() {
        assert_eq!(CellValue::from("Alice").display(), "Alice");
        assert_eq!(CellValue::from(5551234567i64).display(), "5551234567");
        assert_eq!(CellValue::Bool(true).display(), "TRUE");
        assert_eq!(CellValue::Empty.display(), "");
    }

    #[test]
    fn test_cell_display_integral_float() {
        let cell: CellValue = serde_json::from_value(json!(5551234567.0)).unwrap();
        assert_eq!(cell.display(), "5551234567");

        let cell: CellValue = serde_json::from_value(json!(12.5)).unwrap();
        assert_eq!(cell.display(), "12.5");
    }

    #[test]
    fn test_sheet_row_deserializes_mixed_cells() {
        let row: SheetRow = serde_json::from_value(json!(["Bob", 42, null, false])).unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(row.display_at(0).as_deref(), Some("Bob"));
        assert_eq!(row.display_at(1).as_deref(), Some("42"));
        assert_eq!(row.display_at(2).as_deref(), Some(""));
        assert_eq!(row.display_at(3).as_deref(), Some("FALSE"));
        assert_eq!(row.display_at(4), None);
    }

    #[test]
    fn test_match_result_labels() {
        assert_eq!(MatchResult::found("Alice").outcome_label(), "found");
        assert_eq!(MatchResult::NotFound.outcome_label(), "not_found");
        assert_eq!(
            MatchResult::from(ValidationError::MissingPhone).outcome_label(),
            "invalid"
        );
        assert_eq!(
            MatchResult::from(SourceError::EmptyData).outcome_label(),
            "source_error"
        );
    }
}
