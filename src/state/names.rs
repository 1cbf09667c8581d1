//! Project and resource name validation.
//!
//! Names become path segments verbatim, so anything that could escape the
//! store root or is not portable across filesystems is rejected up front.

use crate::error::{NarrativeError, Result};

/// Characters Windows refuses in file names.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Trim `raw` and check it is usable as a single path segment.
///
/// `what` names the kind of thing being named ("project", "character", ...)
/// and only feeds the error message.
pub fn validate_name(what: &'static str, raw: &str) -> Result<String> {
    let name = raw.trim();
    let invalid = |reason| NarrativeError::InvalidInput {
        what,
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("name cannot be a relative path component"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name cannot contain path separators"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("name cannot contain control characters"));
    }
    if name.contains(RESERVED_CHARS) {
        return Err(invalid("name contains a reserved character"));
    }
    if name.ends_with('.') {
        return Err(invalid("name cannot end with a dot"));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Saga", "Saga" ; "plain")]
    #[test_case("  The Long Night  ", "The Long Night" ; "trimmed")]
    #[test_case("Dr. Watson", "Dr. Watson" ; "inner dot")]
    #[test_case("café ünïcode", "café ünïcode" ; "unicode")]
    fn test_valid_names(raw: &str, expected: &str) {
        assert_eq!(validate_name("project", raw).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("." ; "dot")]
    #[test_case(".." ; "dotdot")]
    #[test_case("../escape" ; "traversal")]
    #[test_case("a/b" ; "slash")]
    #[test_case("a\\b" ; "backslash")]
    #[test_case("tab\there" ; "control")]
    #[test_case("what?" ; "reserved")]
    #[test_case("trailing." ; "trailing dot")]
    fn test_invalid_names(raw: &str) {
        let err = validate_name("resource", raw).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
