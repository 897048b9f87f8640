//! Query validation
//!
//! Turns untrusted query parameters into a [`LookupRequest`]. Checks run in a
//! fixed order and the first failure wins:
//! 1. `spreadsheetID` present
//! 2. `cellsRange` (defaulted) matches the range grammar
//! 3. `phone` present
//! 4. column indices and phone mask fall back to defaults when unusable

use regex::Regex;

use crate::error::{ConfigError, CoreResult, ValidationError};
use crate::normalizer::clamp_suffix_length;
use crate::types::{
    param, LookupRequest, QueryParams, DEFAULT_CELLS_RANGE, DEFAULT_NAME_COLUMN,
    DEFAULT_PHONE_COLUMN, DEFAULT_PHONE_SUFFIX_LENGTH,
};

/// Optional `SheetName!` prefix, start cell, colon, end column with optional row.
pub const CELLS_RANGE_PATTERN: &str = r"^(?:.+!)?[A-Z]+[0-9]+:[A-Z]+[0-9]*$";

/// Validates raw lookup parameters.
///
/// Build one at startup and share it; the range pattern is compiled once here.
#[derive(Debug, Clone)]
pub struct QueryValidator {
    cells_range: Regex,
}

impl QueryValidator {
    pub fn new() -> CoreResult<Self> {
        let cells_range = Regex::new(CELLS_RANGE_PATTERN).map_err(|e| ConfigError::InvalidValue {
            field: "cells_range_pattern".to_string(),
            value: CELLS_RANGE_PATTERN.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { cells_range })
    }

    /// Whether `range` is an acceptable cells range such as `Sheet1!A2:B`.
    pub fn is_valid_cells_range(&self, range: &str) -> bool {
        self.cells_range.is_match(range)
    }

    pub fn validate(&self, params: &QueryParams) -> Result<LookupRequest, ValidationError> {
        let spreadsheet_id = params
            .get(param::SPREADSHEET_ID)
            .ok_or(ValidationError::MissingSpreadsheetId)?;

        let cells_range = params.get(param::CELLS_RANGE).unwrap_or(DEFAULT_CELLS_RANGE);
        if !self.is_valid_cells_range(cells_range) {
            return Err(ValidationError::InvalidCellsRange);
        }

        let phone = params.get(param::PHONE).ok_or(ValidationError::MissingPhone)?;

        let name_column = parse_index(params, param::NAME_COLUMN).unwrap_or(DEFAULT_NAME_COLUMN);
        let phone_column =
            parse_index(params, param::PHONE_COLUMN).unwrap_or(DEFAULT_PHONE_COLUMN);
        let requested_suffix = parse_index(params, param::PHONE_MASK)
            .filter(|length| *length > 0)
            .unwrap_or(DEFAULT_PHONE_SUFFIX_LENGTH);

        Ok(LookupRequest::new(
            spreadsheet_id.to_string(),
            cells_range.to_string(),
            phone.to_string(),
            name_column,
            phone_column,
            clamp_suffix_length(phone, requested_suffix),
        ))
    }
}

/// Parse an optional non-negative integer parameter. Unparsable values are
/// treated as absent.
fn parse_index(params: &QueryParams, name: &str) -> Option<usize> {
    let raw = params.get(name)?;
    match raw.parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(param = name, value = raw, "Ignoring unparsable parameter");
            None
        }
    }
}
