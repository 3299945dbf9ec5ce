//! Database path and key helpers.

use crate::error::{AppError, Result};

/// Longest key the database accepts, in bytes.
pub const MAX_KEY_BYTES: usize = 768;

const FORBIDDEN: [char; 6] = ['.', '$', '#', '[', ']', '/'];

/// Check that `key` can be used as a single database key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || key.len() > MAX_KEY_BYTES
        || key.chars().any(|c| FORBIDDEN.contains(&c) || c.is_ascii_control())
    {
        return Err(AppError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Split a slash-separated path into its non-empty segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Join two paths with a single slash.
pub fn join(base: &str, child: &str) -> String {
    let base = base.trim_end_matches('/');
    let child = child.trim_start_matches('/');
    match (base.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{child}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_plain_keys() {
        assert!(validate_key("A1B2C3D4").is_ok());
        assert!(validate_key("Lab 1").is_ok());
        assert!(validate_key("2024-batch").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_forbidden() {
        for key in ["", "a.b", "a$b", "a#b", "a[b", "a]b", "a/b", "tab\there"] {
            assert!(validate_key(key).is_err(), "accepted {key:?}");
        }
        assert!(validate_key(&"x".repeat(MAX_KEY_BYTES + 1)).is_err());
    }

    #[test]
    fn test_segments_skip_empty() {
        assert_eq!(segments("/schedules//Lab1/B1/"), vec!["schedules", "Lab1", "B1"]);
        assert!(segments("/").is_empty());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("users", "abc"), "users/abc");
        assert_eq!(join("users/", "/abc"), "users/abc");
        assert_eq!(join("", "abc"), "abc");
        assert_eq!(join("users", "/"), "users");
    }
}
