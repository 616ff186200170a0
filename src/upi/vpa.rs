//! Virtual Payment Address validation (NPCI `username@handle` format).

use crate::domain::ValidationResult;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_VPA_LENGTH: usize = 5;
pub const MAX_VPA_LENGTH: usize = 100;

static VPA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9]+$").expect("VPA pattern is a valid regex")
});

/// Validate a candidate VPA, collecting every failed rule.
///
/// Rules, in order: present, length within bounds (after trimming), overall
/// `username@handle` shape, a single `@`, and both sides non-empty.
pub fn validate_vpa(vpa: Option<&str>) -> ValidationResult {
    let vpa = match vpa {
        Some(v) if !v.is_empty() => v,
        _ => return ValidationResult::from_errors(vec!["VPA is required".to_string()]),
    };

    let mut errors = Vec::new();
    let trimmed = vpa.trim();

    let length = trimmed.chars().count();
    if !(MIN_VPA_LENGTH..=MAX_VPA_LENGTH).contains(&length) {
        errors.push(format!(
            "VPA must be between {} and {} characters",
            MIN_VPA_LENGTH, MAX_VPA_LENGTH
        ));
    }

    if !VPA_PATTERN.is_match(trimmed) {
        errors.push("VPA format is invalid (expected username@bankhandle)".to_string());
    }

    let parts: Vec<&str> = trimmed.split('@').collect();
    if parts.len() != 2 {
        errors.push("VPA must contain exactly one @ symbol".to_string());
    } else if parts[0].is_empty() || parts[1].is_empty() {
        errors.push("VPA username and handle cannot be empty".to_string());
    }

    ValidationResult::from_errors(errors)
}

/// Shorthand for `validate_vpa(Some(vpa)).is_valid`.
pub fn is_valid_vpa(vpa: &str) -> bool {
    validate_vpa(Some(vpa)).is_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_vpas() {
        for vpa in [
            "merchant@paytm",
            "john.doe@okaxis",
            "user_01-x@ybl",
            "  padded@upi  ",
            "a1b@x",
        ] {
            let result = validate_vpa(Some(vpa));
            assert!(result.is_valid, "{} should be valid: {:?}", vpa, result.errors);
        }
    }

    #[test]
    fn test_missing_vpa() {
        for vpa in [None, Some("")] {
            let result = validate_vpa(vpa);
            assert!(!result.is_valid);
            assert_eq!(result.errors, vec!["VPA is required"]);
        }
    }

    #[test]
    fn test_too_short() {
        let result = validate_vpa(Some("a@b"));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["VPA must be between 5 and 100 characters"]);
    }

    #[test]
    fn test_too_long() {
        let vpa = format!("{}@bank", "a".repeat(100));
        let result = validate_vpa(Some(&vpa));
        assert_eq!(result.errors, vec!["VPA must be between 5 and 100 characters"]);
    }

    #[test]
    fn test_missing_at_collects_all_errors() {
        let result = validate_vpa(Some("invalid-vpa"));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "VPA format is invalid (expected username@bankhandle)",
                "VPA must contain exactly one @ symbol",
            ]
        );
    }

    #[test]
    fn test_multiple_at_symbols() {
        let result = validate_vpa(Some("user@bank@upi"));
        assert!(result
            .errors
            .contains(&"VPA must contain exactly one @ symbol".to_string()));
        assert!(result
            .errors
            .contains(&"VPA format is invalid (expected username@bankhandle)".to_string()));
    }

    #[test]
    fn test_empty_sides() {
        let result = validate_vpa(Some("@paytm"));
        assert!(result
            .errors
            .contains(&"VPA username and handle cannot be empty".to_string()));

        let result = validate_vpa(Some("merchant@"));
        assert!(result
            .errors
            .contains(&"VPA username and handle cannot be empty".to_string()));
    }

    #[test]
    fn test_handle_must_be_alphanumeric() {
        assert!(!is_valid_vpa("merchant@pay.tm"));
        assert!(!is_valid_vpa("mer chant@paytm"));
        assert!(is_valid_vpa("merchant@paytm"));
    }

    #[test]
    fn test_whitespace_only_fails_length_and_format() {
        let result = validate_vpa(Some("     "));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[0], "VPA must be between 5 and 100 characters");
    }
}
