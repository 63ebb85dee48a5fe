//! Query classification.
//!
//! Decides whether an input is a mobile number or a CNIC before anything is
//! sent upstream.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{ClassifiedQuery, QueryKind};

/// Hint returned to callers whose input matches neither shape.
pub const INVALID_QUERY_HINT: &str =
    "Invalid query. Use mobile with country code (92...) or CNIC (13 digits).";

static MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^92[0-9]{9,12}$").expect("mobile pattern is valid"));

static CNIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13}$").expect("cnic pattern is valid"));

/// `92` followed by 9 to 12 digits, nothing else.
pub fn is_mobile(value: &str) -> bool {
    MOBILE.is_match(value.trim())
}

/// Exactly 13 digits that are not already a mobile number.
///
/// A 13-digit value starting with `92` is a mobile number, so the two
/// predicates never both hold.
pub fn is_cnic(value: &str) -> bool {
    let value = value.trim();
    CNIC.is_match(value) && !MOBILE.is_match(value)
}

/// Trim and classify raw caller input.
pub fn classify(raw: &str) -> Result<ClassifiedQuery> {
    let value = raw.trim();
    if is_mobile(value) {
        return Ok(ClassifiedQuery::new(QueryKind::MobileNumber, value));
    }
    if is_cnic(value) {
        return Ok(ClassifiedQuery::new(QueryKind::NationalId, value));
    }
    Err(AppError::invalid_query(INVALID_QUERY_HINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_mobile_number() {
        let query = classify("923323312487").unwrap();
        assert_eq!(query.kind(), QueryKind::MobileNumber);
        assert_eq!(query.normalized(), "923323312487");
    }

    #[test]
    fn classifies_cnic() {
        let query = classify("1234567890123").unwrap();
        assert_eq!(query.kind(), QueryKind::NationalId);
        assert_eq!(query.normalized(), "1234567890123");
    }

    #[test]
    fn trims_before_classifying() {
        let query = classify("  923001234567\n").unwrap();
        assert_eq!(query.normalized(), "923001234567");
    }

    #[test]
    fn mobile_length_bounds() {
        // 92 + 9 digits is the shortest, 92 + 12 the longest
        assert!(is_mobile("92123456789"));
        assert!(is_mobile("92123456789012"));
        assert!(!is_mobile("9212345678"));
        assert!(!is_mobile("921234567890123"));
    }

    #[test]
    fn rejects_separators_and_letters() {
        for input in ["abc", "", "   ", "92-300-1234567", "+923001234567", "12345-6789012-3", "92300123456a"] {
            let err = classify(input).unwrap_err();
            assert!(matches!(err, AppError::InvalidQuery(_)), "{input:?}");
            assert_eq!(err.detail(), INVALID_QUERY_HINT);
        }
    }

    #[test]
    fn thirteen_digits_with_country_code_is_mobile() {
        let query = classify("9230012345678").unwrap();
        assert_eq!(query.kind(), QueryKind::MobileNumber);
    }

    #[test]
    fn predicates_never_overlap() {
        let samples = [
            "92123456789",
            "9212345678901",
            "9230012345678",
            "1234567890123",
            "0000000000000",
            "92123456789012",
            "4210112345671",
        ];
        for sample in samples {
            assert!(!(is_mobile(sample) && is_cnic(sample)), "{sample}");
        }
        for digits in 0..=16 {
            let value = format!("92{}", "7".repeat(digits));
            assert!(!(is_mobile(&value) && is_cnic(&value)), "{value}");
        }
    }

    #[test]
    fn unicode_digits_are_rejected() {
        // Arabic-Indic digits are not ASCII digits
        assert!(classify("٤٢١٠١١٢٣٤٥٦٧١").is_err());
    }
}
