//! Phone normalization: reduce a raw phone string to the suffix that is
//! compared against sheet cells.

/// Return the trailing `suffix_length` characters of `phone`.
///
/// The phone is used verbatim, no digit stripping or separator removal. A
/// suffix length larger than the phone returns the whole phone.
pub fn normalize(phone: &str, suffix_length: usize) -> String {
    let total = phone.chars().count();
    let skip = total.saturating_sub(suffix_length);
    phone.chars().skip(skip).collect()
}

/// Effective suffix length for `phone`: `requested` clamped to its length.
pub fn clamp_suffix_length(phone: &str, requested: usize) -> usize {
    requested.min(phone.chars().count())
}
