//! Error Types for the SheetCRM API
//!
//! This module defines error handling for the HTTP layer:
//! - ApiError struct carrying a code and the response text
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! Errors are written as short plain-text bodies, the format the calling IVR
//! expects.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sheetcrm_core::{ConfigError, CoreError, SourceError, ValidationError};
use sheetcrm_sheets::SheetsError;
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Required query parameter is missing
    MissingField,

    /// Query parameter format is incorrect
    InvalidFormat,

    /// A fetched row does not reach the requested column
    InvalidColumn,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// The spreadsheet could not be read or holds no rows
    EmptyData,

    /// No row matched the phone suffix
    NotFound,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Startup configuration is invalid
    InvalidConfig,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingField | ErrorCode::InvalidFormat | ErrorCode::InvalidColumn => {
                StatusCode::BAD_REQUEST
            }

            ErrorCode::EmptyData | ErrorCode::NotFound => StatusCode::NOT_FOUND,

            ErrorCode::InvalidConfig | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "Missed parameter",
            ErrorCode::InvalidFormat => "Invalid parameter",
            ErrorCode::InvalidColumn => "Invalid number of column",
            ErrorCode::EmptyData => "Empty data",
            ErrorCode::NotFound => "Not found",
            ErrorCode::InvalidConfig => "Invalid configuration",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Error returned by the lookup endpoint and the startup path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Response body text
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn empty_data() -> Self {
        Self::from_code(ErrorCode::EmptyData)
    }

    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::NotFound)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Written as `(status, text/plain body)`.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), self.message).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingSpreadsheetId => {
                ApiError::new(ErrorCode::MissingField, "Missed spreadsheetID")
            }
            ValidationError::InvalidCellsRange => {
                ApiError::new(ErrorCode::InvalidFormat, "Invalid cells range")
            }
            ValidationError::MissingPhone => {
                ApiError::new(ErrorCode::MissingField, "Missed phone number")
            }
            ValidationError::InvalidPhoneColumn => {
                ApiError::new(ErrorCode::InvalidColumn, "Invalid number of phone column")
            }
            ValidationError::InvalidNameColumn => {
                ApiError::new(ErrorCode::InvalidColumn, "Invalid number of name column")
            }
        }
    }
}

/// Every source failure reads as "Empty data" to the caller; the reason is
/// only logged.
impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        tracing::debug!(error = %err, "Spreadsheet source error");
        ApiError::empty_data()
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::invalid_config(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::Source(e) => e.into(),
            CoreError::Config(e) => e.into(),
        }
    }
}

/// Only reachable on the startup path (building the client).
impl From<SheetsError> for ApiError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Credentials { reason } => {
                ApiError::invalid_config(format!("Invalid spreadsheet credentials: {}", reason))
            }
            other => ApiError::internal_error(other.to_string()),
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
