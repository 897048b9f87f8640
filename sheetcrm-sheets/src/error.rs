//! Spreadsheet backend errors

use sheetcrm_core::SourceError;
use thiserror::Error;

/// Failures talking to the spreadsheet backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SheetsError {
    #[error("Invalid credentials: {reason}")]
    Credentials { reason: String },

    #[error("Authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Request to spreadsheet backend failed: {reason}")]
    Transport { reason: String },

    #[error("Spreadsheet backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from spreadsheet backend: {reason}")]
    InvalidResponse { reason: String },
}

impl SheetsError {
    /// Whether the backend reported the spreadsheet or range as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SheetsError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for SheetsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SheetsError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            SheetsError::Transport {
                reason: err.to_string(),
            }
        }
    }
}

impl From<SheetsError> for SourceError {
    fn from(err: SheetsError) -> Self {
        SourceError::unavailable(err.to_string())
    }
}

/// Result type alias for spreadsheet backend operations.
pub type SheetsResult<T> = Result<T, SheetsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_not_found() {
        let err = SheetsError::Status {
            status: 404,
            message: "Requested entity was not found.".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!SheetsError::Auth {
            reason: "expired".to_string()
        }
        .is_not_found());
    }

    #[test]
    fn test_into_source_error_keeps_reason() {
        let err = SheetsError::Status {
            status: 403,
            message: "The caller does not have permission".to_string(),
        };
        let source: SourceError = err.into();
        match source {
            SourceError::Unavailable { reason } => {
                assert!(reason.contains("403"));
                assert!(reason.contains("permission"));
            }
            other => panic!("unexpected source error: {:?}", other),
        }
    }
}
