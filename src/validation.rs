//! Input validation for identifiers and listing fields.
//!
//! CNIC and phone formats follow the national conventions the system was
//! built around: `#####-#######-#` for CNICs and `03XXXXXXXXX` for mobile
//! numbers (dashes and spaces tolerated on input).

use regex::Regex;
use std::sync::LazyLock;

static CNIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{7}-\d$").expect("CNIC regex is valid"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^03\d{9}$").expect("phone regex is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Minimum accepted listing weight in kilograms.
pub const MIN_WEIGHT_KG: f64 = 0.1;
/// Maximum accepted listing weight in kilograms.
pub const MAX_WEIGHT_KG: f64 = 10_000.0;

/// Validate CNIC format: `12345-1234567-1`.
pub fn validate_cnic(cnic: &str) -> bool {
    !cnic.trim().is_empty() && CNIC_RE.is_match(cnic)
}

/// Validate phone format: `03XXXXXXXXX`. Dashes and spaces are stripped
/// before matching.
pub fn validate_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return false;
    }
    let normalized: String = phone.chars().filter(|c| *c != '-' && *c != ' ').collect();
    PHONE_RE.is_match(&normalized)
}

/// Validate that a weight is inside the accepted listing range.
pub fn validate_weight(weight: f64) -> bool {
    (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight)
}

/// Validate a required string field.
pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Trim and collapse interior whitespace runs to single spaces.
pub fn sanitize(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    WHITESPACE_RE.replace_all(input.trim(), " ").into_owned()
}
