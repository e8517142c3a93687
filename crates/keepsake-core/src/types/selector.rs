//! Addressing-safety validation for selectors.
//!
//! Selectors originate from untrusted client input (they arrive in
//! remember-me cookies) and are embedded verbatim in storage unit names,
//! so they are validated before any I/O is attempted.

use crate::error::StoreError;
use crate::result::StoreResult;

/// Maximum accepted selector length.
const MAX_SELECTOR_LEN: usize = 128;

/// Validate that a selector is safe to embed in a storage unit name.
///
/// Accepts non-empty strings of at most 128 ASCII alphanumerics, `-`,
/// and `_`. Everything else (path separators, `..`, NUL, whitespace)
/// is rejected with an `InvalidSelector` error before the backend
/// touches its medium.
pub fn validate_selector(selector: &str) -> StoreResult<()> {
    if selector.is_empty() {
        return Err(StoreError::invalid_selector("Selector must not be empty"));
    }
    if selector.len() > MAX_SELECTOR_LEN {
        return Err(StoreError::invalid_selector(format!(
            "Selector exceeds {MAX_SELECTOR_LEN} characters"
        )));
    }
    if !selector
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(StoreError::invalid_selector(format!(
            "Selector contains characters unsafe for addressing: {selector:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_typical_generated_selectors() {
        for selector in ["sel1", "3f2A9c", "a-b_c", "A", &"x".repeat(128)] {
            assert!(validate_selector(selector).is_ok(), "{selector}");
        }
    }

    #[test]
    fn rejects_path_traversal_and_unsafe_input() {
        for selector in [
            "",
            "../../etc/passwd",
            "..",
            "a/b",
            "a\\b",
            "a b",
            "sel\0",
            "sel.token",
            &"x".repeat(129),
        ] {
            let err = validate_selector(selector).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidSelector, "{selector:?}");
        }
    }
}
