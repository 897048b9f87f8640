//! Property-Based Tests for the Lookup Endpoint
//!
//! **Property: Single fetch per valid request**
//!
//! For any request carrying a spreadsheet ID and a phone, the handler SHALL
//! fetch the spreadsheet exactly once, and for any request missing either it
//! SHALL NOT fetch at all.
//!
//! **Property: Matched names are returned verbatim**
//!
//! For any sheet whose rows all carry distinct phones, looking up a row's
//! phone SHALL answer 200 with that row's name.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use proptest::prelude::*;
use sheetcrm_api::{create_api_router, ApiConfig, AppState, QueryHandler, ResponseOptions};
use sheetcrm_test_utils::fixtures::{self, lookup_uri, SPREADSHEET_ID};
use sheetcrm_test_utils::generators::{arb_contact_sheet, arb_phone};
use sheetcrm_test_utils::StaticSheetClient;
use tokio::runtime::Runtime;
use tower::ServiceExt;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

async fn lookup(
    client: Arc<StaticSheetClient>,
    uri: &str,
) -> Result<(StatusCode, String), TestCaseError> {
    let handler = QueryHandler::new(client, fixtures::validator(), ResponseOptions::default());
    let router = create_api_router(AppState::new(handler), &ApiConfig::new(8080));

    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .map_err(|e| TestCaseError::fail(format!("Failed to build request: {}", e)))?;
    let response = router
        .oneshot(request)
        .await
        .map_err(|e| TestCaseError::fail(format!("Request failed: {}", e)))?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| TestCaseError::fail(format!("Failed to read body: {}", e)))?;
    Ok((status, String::from_utf8_lossy(&body).into_owned()))
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_valid_request_fetches_once(
        sheet in arb_contact_sheet(8),
        phone in arb_phone(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let client = Arc::new(StaticSheetClient::new(sheet));
            let uri = lookup_uri(&[("spreadsheetID", SPREADSHEET_ID), ("phone", phone.as_str())]);

            let (status, _) = lookup(client.clone(), &uri).await?;
            prop_assert!(
                matches!(status, StatusCode::OK | StatusCode::NOT_FOUND),
                "unexpected status {}",
                status
            );
            prop_assert_eq!(client.call_count(), 1);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_invalid_request_never_fetches(
        sheet in arb_contact_sheet(4),
        phone in arb_phone(),
        drop_id in any::<bool>(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let client = Arc::new(StaticSheetClient::new(sheet));
            let uri = if drop_id {
                lookup_uri(&[("phone", phone.as_str())])
            } else {
                lookup_uri(&[("spreadsheetID", SPREADSHEET_ID)])
            };

            let (status, body) = lookup(client.clone(), &uri).await?;
            prop_assert_eq!(status, StatusCode::BAD_REQUEST);
            let expected = if drop_id { "Missed spreadsheetID" } else { "Missed phone number" };
            prop_assert_eq!(body.as_str(), expected);
            prop_assert_eq!(client.call_count(), 0);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_exact_phone_returns_row_name(
        names in prop::collection::vec("[A-Z][a-z]{1,8}", 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        // Distinct ten-digit phones that share no suffix of length ten.
        let data: Vec<(String, String)> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), format!("55500{:05}", i)))
            .collect();
        let rows = data
            .iter()
            .map(|(name, phone)| fixtures::contact_row(name, phone))
            .collect();
        let (expected_name, phone) = &data[pick.index(data.len())];

        let rt = test_runtime()?;
        rt.block_on(async {
            let client = Arc::new(StaticSheetClient::new(rows));
            let uri = lookup_uri(&[("spreadsheetID", SPREADSHEET_ID), ("phone", phone.as_str())]);

            let (status, body) = lookup(client, &uri).await?;
            prop_assert_eq!(status, StatusCode::OK);
            prop_assert_eq!(&body, expected_name);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
