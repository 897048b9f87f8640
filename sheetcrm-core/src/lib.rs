//! SheetCRM Core - Caller Lookup Logic
//!
//! Validation of untrusted lookup parameters, phone suffix normalization and
//! first-match row scanning. No I/O happens here; rows are handed in by the
//! caller after it fetched them from the spreadsheet source.

pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod types;
pub mod validator;

pub use error::{ConfigError, CoreError, CoreResult, SourceError, ValidationError};
pub use matcher::{match_request, match_rows};
pub use normalizer::{clamp_suffix_length, normalize};
pub use types::{
    param, CellValue, LookupRequest, MatchResult, QueryParams, SheetRow, DEFAULT_CELLS_RANGE,
    DEFAULT_NAME_COLUMN, DEFAULT_PHONE_COLUMN, DEFAULT_PHONE_SUFFIX_LENGTH,
};
pub use validator::{QueryValidator, CELLS_RANGE_PATTERN};
