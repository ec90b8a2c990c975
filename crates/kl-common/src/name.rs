//! Configuration name grammar.
//!
//! Names match `[A-Za-z][A-Za-z0-9_-]*`. The recommended convention is
//! upper case separated by underscores, but any match is accepted. The same
//! grammar names declared types, declared variables, and `$name` expansion
//! targets.

use regex::Regex;
use std::sync::LazyLock;

/// The unanchored name grammar, for embedding into larger patterns.
pub const NAME_PATTERN: &str = "[A-Za-z][A-Za-z0-9_-]*";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_PATTERN}$")).expect("name regex"));

/// Check whether `s` is a valid configuration name.
pub fn is_valid_name(s: &str) -> bool {
    NAME_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_upper_snake() {
        assert!(is_valid_name("MAX_RETRIES"));
    }

    #[test]
    fn accepts_mixed_case_digits_and_dash() {
        assert!(is_valid_name("puzzle-2"));
        assert!(is_valid_name("aB9_x"));
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(!is_valid_name("2fast"));
    }

    #[test]
    fn rejects_leading_underscore() {
        assert!(!is_valid_name("_hidden"));
    }

    #[test]
    fn rejects_empty() {
        assert!(!is_valid_name(""));
    }

    #[test]
    fn rejects_embedded_space() {
        assert!(!is_valid_name("A B"));
    }

    #[test]
    fn rejects_dollar() {
        assert!(!is_valid_name("$NAME"));
    }
}
