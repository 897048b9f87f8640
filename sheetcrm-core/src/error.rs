//! Error types for SheetCRM lookups

use thiserror::Error;

/// Request-shape errors.
///
/// Raised by the query validator for missing or malformed parameters, and by
/// the row matcher when a fetched row is too short for the requested columns.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("missing spreadsheet identifier")]
    MissingSpreadsheetId,

    #[error("invalid cells range")]
    InvalidCellsRange,

    #[error("missing phone number")]
    MissingPhone,

    #[error("invalid column index: phone column out of row bounds")]
    InvalidPhoneColumn,

    #[error("invalid column index: name column out of row bounds")]
    InvalidNameColumn,
}

impl ValidationError {
    /// Whether this error was produced by a row that is too short.
    pub fn is_column_error(&self) -> bool {
        matches!(
            self,
            ValidationError::InvalidPhoneColumn | ValidationError::InvalidNameColumn
        )
    }
}

/// Spreadsheet source errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("spreadsheet source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("spreadsheet range returned no rows")]
    EmptyData,
}

impl SourceError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for SheetCRM core operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for SheetCRM core operations.
pub type CoreResult<T> = Result<T, CoreError>;
