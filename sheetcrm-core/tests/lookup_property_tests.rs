//! Property-Based Tests for Lookup Validation and Matching
//!
//! **Property 1: Suffix Clamping**
//! The resolved suffix length never exceeds the phone length, and defaults to
//! 10 when no mask is given.
//!
//! **Property 2: First Match Wins**
//! When several rows end with the queried suffix, the earliest row's name is
//! returned.
//!
//! **Property 3: Malformed Rows Are Never Skipped**
//! A row shorter than the requested columns ends the scan with a validation
//! error unless a match occurred before it.

use proptest::prelude::*;
use sheetcrm_core::{
    match_rows, normalize, MatchResult, QueryParams, QueryValidator, SheetRow, ValidationError,
};

fn phone_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,15}"
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}"
}

fn row(name: &str, phone: &str) -> SheetRow {
    [name, phone].into_iter().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_default_suffix_length(phone in phone_strategy()) {
        let validator = QueryValidator::new().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let params = QueryParams::new()
            .with("spreadsheetID", "sheet")
            .with("phone", phone.clone());
        let request = validator
            .validate(&params)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(request.phone_suffix_length(), phone.len().min(10));
        prop_assert!(phone.ends_with(&request.normalized_phone()));
    }

    #[test]
    fn prop_mask_never_exceeds_phone(phone in phone_strategy(), mask in 1usize..64) {
        let validator = QueryValidator::new().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let params = QueryParams::new()
            .with("spreadsheetID", "sheet")
            .with("phone", phone.clone())
            .with("phoneMask", mask.to_string());
        let request = validator
            .validate(&params)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert!(request.phone_suffix_length() <= phone.len());
        prop_assert_eq!(request.normalized_phone().len(), mask.min(phone.len()));
    }

    #[test]
    fn prop_normalize_is_suffix(phone in "\\PC{0,20}", length in 0usize..30) {
        let suffix = normalize(&phone, length);
        prop_assert!(phone.ends_with(&suffix));
        prop_assert_eq!(suffix.chars().count(), length.min(phone.chars().count()));
    }

    #[test]
    fn prop_first_match_wins(
        names in prop::collection::vec(name_strategy(), 2..8),
        prefix in "[0-9]{3}",
        suffix in "[0-9]{4}",
    ) {
        let rows: Vec<SheetRow> = names
            .iter()
            .map(|name| row(name, &format!("{}{}", prefix, suffix)))
            .collect();

        prop_assert_eq!(
            match_rows(&rows, 1, 0, &suffix),
            MatchResult::Found { name: names[0].clone() }
        );
    }

    #[test]
    fn prop_short_row_stops_scan(
        leading in prop::collection::vec(name_strategy(), 0..5),
        suffix in "[0-9]{4}",
    ) {
        let mut rows: Vec<SheetRow> = leading
            .iter()
            .map(|name| row(name, "0000000000x"))
            .collect();
        rows.push([leading.first().map(String::as_str).unwrap_or("Solo")].into_iter().collect());
        rows.push(row("Late", &format!("555{}", suffix)));

        prop_assert_eq!(
            match_rows(&rows, 1, 0, &suffix),
            MatchResult::ValidationError(ValidationError::InvalidPhoneColumn)
        );
    }
}
