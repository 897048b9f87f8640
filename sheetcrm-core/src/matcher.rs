//! Row matching: first row whose phone cell ends with the normalized suffix.

use crate::error::ValidationError;
use crate::types::{LookupRequest, MatchResult, SheetRow};

/// Scan `rows` in order and return the name of the first row whose phone cell
/// ends with `suffix`.
///
/// A row too short for either column stops the scan with a validation error;
/// such rows are never skipped. The phone column is checked first.
pub fn match_rows(
    rows: &[SheetRow],
    phone_column: usize,
    name_column: usize,
    suffix: &str,
) -> MatchResult {
    for (position, row) in rows.iter().enumerate() {
        if row.len() <= phone_column {
            tracing::warn!(position, row_len = row.len(), phone_column, "Row has no phone column");
            return ValidationError::InvalidPhoneColumn.into();
        }
        if row.len() <= name_column {
            tracing::warn!(position, row_len = row.len(), name_column, "Row has no name column");
            return ValidationError::InvalidNameColumn.into();
        }

        let Some(phone) = row.display_at(phone_column) else {
            return ValidationError::InvalidPhoneColumn.into();
        };
        tracing::debug!(position, phone = %phone, "Inspecting row");

        if phone.ends_with(suffix) {
            let name = row.display_at(name_column).unwrap_or_default();
            tracing::info!(name = %name, phone = %phone, "Found customer");
            return MatchResult::Found { name };
        }
    }

    tracing::info!(suffix, "Didn't find any customer");
    MatchResult::NotFound
}

/// [`match_rows`] driven by a resolved request.
pub fn match_request(rows: &[SheetRow], request: &LookupRequest) -> MatchResult {
    match_rows(
        rows,
        request.phone_column(),
        request.name_column(),
        &request.normalized_phone(),
    )
}
