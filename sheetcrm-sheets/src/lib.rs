//! SheetCRM Sheets - Spreadsheet Source Layer
//!
//! Defines the [`SpreadsheetClient`] seam the lookup handler depends on and a
//! Google Sheets implementation of it. Test doubles live in
//! `sheetcrm-test-utils`.

pub mod auth;
pub mod config;
pub mod error;
pub mod google;

use async_trait::async_trait;
use sheetcrm_core::SheetRow;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, SHEETS_READONLY_SCOPE};
pub use config::{Credentials, SheetsConfig};
pub use error::{SheetsError, SheetsResult};
pub use google::{GoogleSheetsClient, ValueRange};

/// Source of spreadsheet rows.
///
/// Implementations must be thread-safe (Send + Sync); one instance is shared by
/// all concurrent requests.
#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Fetch the rows of `range` in `spreadsheet_id`, in sheet order.
    ///
    /// # Returns
    /// * `Ok(rows)` - possibly empty when the range holds no values
    /// * `Err(SheetsError)` - auth, network, HTTP status or payload failures
    async fn fetch(&self, spreadsheet_id: &str, range: &str) -> SheetsResult<Vec<SheetRow>>;

    /// Short backend identifier for logs.
    fn backend_name(&self) -> &str;
}
