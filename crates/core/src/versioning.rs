//! Version tokens for optimistic concurrency control.
//!
//! Clients echo the version they last saw as a quoted integer (`"3"`), the
//! same shape as the `ETag` the read path sends.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::Version;

/// A quoted integer of one to three digits, nothing before or after.
pub const VERSION_PATTERN: &str = r#"^"\d{1,3}"$"#;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_PATTERN).expect("valid regex"));

/// Parse a client-supplied version token.
pub fn parse_version_token(token: &str) -> Result<Version, CoreError> {
    if !VERSION_RE.is_match(token) {
        return Err(CoreError::VersionInvalid(token.to_string()));
    }
    token[1..token.len() - 1]
        .parse()
        .map_err(|_| CoreError::VersionInvalid(token.to_string()))
}

/// Reject an attempt based on a version older than the stored one.
///
/// A newer-than-stored version is accepted; only going backwards is a lost
/// update.
pub fn check_version(attempted: Version, stored: Version) -> Result<(), CoreError> {
    if attempted < stored {
        return Err(CoreError::VersionOutdated { attempted });
    }
    Ok(())
}

/// Render a version as an entity tag.
pub fn etag(version: Version) -> String {
    format!("\"{version}\"")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_quoted_integers() {
        assert_eq!(parse_version_token("\"0\"").unwrap(), 0);
        assert_eq!(parse_version_token("\"42\"").unwrap(), 42);
        assert_eq!(parse_version_token("\"999\"").unwrap(), 999);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "0", "\"-1\"", "\"abc\"", "\"1000\"", "\"\"", "\"1", "1\"", "\"1\"x", "W/\"1\"",
            " \"1\"", "",
        ] {
            assert_matches!(
                parse_version_token(token),
                Err(CoreError::VersionInvalid(t)) if t == token,
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn only_older_versions_are_outdated() {
        assert_matches!(
            check_version(0, 1),
            Err(CoreError::VersionOutdated { attempted: 0 })
        );
        assert!(check_version(1, 1).is_ok());
        assert!(check_version(5, 1).is_ok());
    }

    #[test]
    fn etag_round_trips() {
        assert_eq!(etag(7), "\"7\"");
        assert_eq!(parse_version_token(&etag(7)).unwrap(), 7);
    }
}
