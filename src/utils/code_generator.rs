//! Short code generation, normalization and validation.
//!
//! Codes are case-insensitive: every code is lowercased before it is stored,
//! looked up or compared. Generated codes are drawn from the mixed-case
//! alphanumeric alphabet and lowercased afterwards.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::AppError;

/// Alphabet random codes are drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 7;

/// Maximum length of any stored code.
pub const MAX_CODE_LENGTH: usize = 32;

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("code pattern compiles"));

/// Generates a random 7-character code, already normalized.
///
/// Each character is drawn uniformly from `A-Z a-z 0-9` before lowercasing.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 7);
/// assert!(is_valid_code(&code));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    let code: String = (0..GENERATED_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect();

    normalize_code(&code)
}

/// Lowercases a raw code. Idempotent.
pub fn normalize_code(raw: &str) -> String {
    raw.to_lowercase()
}

/// Checks an already-normalized code against the storage format.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: lowercase letters, digits, hyphens
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= MAX_CODE_LENGTH && CODE_REGEX.is_match(code)
}

/// Normalizes a caller-supplied code and checks its format.
///
/// Returns the normalized code on success.
///
/// # Errors
///
/// Returns [`AppError::InvalidFormat`] if the normalized code is not valid.
pub fn validate_custom_code(raw: &str) -> Result<String, AppError> {
    let code = normalize_code(raw);

    if !is_valid_code(&code) {
        return Err(AppError::InvalidFormat { code });
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = generate_code();
        assert_eq!(code.len(), GENERATED_CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_is_normalized() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code, normalize_code(&code));
            assert!(is_valid_code(&code), "generated code {code} is invalid");
        }
    }

    #[test]
    fn test_generate_code_has_no_hyphens() {
        for _ in 0..200 {
            assert!(generate_code().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_code_produces_distinct_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();

        // 36^7 effective keyspace; a handful of duplicates would already be suspicious
        assert!(codes.len() >= 998);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_code("AbC-12");
        assert_eq!(once, "abc-12");
        assert_eq!(normalize_code(&once), once);
    }

    #[test]
    fn test_valid_codes() {
        assert!(is_valid_code("a"));
        assert!(is_valid_code("abc123"));
        assert!(is_valid_code("my-link"));
        assert!(is_valid_code("-"));
        assert!(is_valid_code(&"a".repeat(MAX_CODE_LENGTH)));
    }

    #[test]
    fn test_invalid_codes() {
        assert!(!is_valid_code(""));
        assert!(!is_valid_code(&"a".repeat(MAX_CODE_LENGTH + 1)));
        assert!(!is_valid_code("MyCode"));
        assert!(!is_valid_code("my_code"));
        assert!(!is_valid_code("my code"));
        assert!(!is_valid_code("my-code!"));
        assert!(!is_valid_code("caf\u{e9}"));
    }

    #[test]
    fn test_validate_custom_code_normalizes() {
        let code = validate_custom_code("Promo-2025").unwrap();
        assert_eq!(code, "promo-2025");
    }

    #[test]
    fn test_validate_custom_code_rejects_after_normalization() {
        let err = validate_custom_code("My-Code!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_validate_custom_code_rejects_empty() {
        let err = validate_custom_code("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }
}
