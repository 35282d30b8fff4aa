//! GitHub API error taxonomy.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by the repository fetcher.
///
/// The variants map one-to-one onto the outward signals the HTTP API
/// exposes: `AuthRequired` becomes 401, `Forbidden` becomes 403, and
/// everything else collapses into a generic 500.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The credential is missing, invalid, or expired.
    #[error("Authentication required")]
    AuthRequired,

    /// Rate limit exhausted or the token lacks the needed scope.
    #[error("Rate limited or insufficient permissions{}", reset_suffix(.reset_at))]
    Forbidden { reset_at: Option<DateTime<Utc>> },

    /// Any other upstream API failure.
    #[error("GitHub API error: {0}")]
    Api(#[source] octocrab::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn reset_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!(". Resets at {at}"),
        None => String::new(),
    }
}

/// Map a raw octocrab error onto the fetcher taxonomy.
///
/// Status 401 means the token was rejected; 403 and 429 cover both rate
/// limiting and missing scopes, which the API reports identically.
pub fn classify_api_error(e: octocrab::Error) -> GitHubError {
    if let octocrab::Error::GitHub { ref source, .. } = e {
        match source.status_code.as_u16() {
            401 => return GitHubError::AuthRequired,
            403 | 429 => return GitHubError::Forbidden { reset_at: None },
            _ => {}
        }
    }
    GitHubError::Api(e)
}

impl GitHubError {
    /// True when backing off (rather than re-authenticating) is the fix.
    #[inline]
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn forbidden_without_reset_has_plain_message() {
        let err = GitHubError::Forbidden { reset_at: None };
        assert_eq!(err.to_string(), "Rate limited or insufficient permissions");
        assert!(err.is_forbidden());
    }

    #[test]
    fn forbidden_with_reset_mentions_it() {
        let reset_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let err = GitHubError::Forbidden {
            reset_at: Some(reset_at),
        };
        assert!(err.to_string().contains("Resets at 2024-06-01"));
    }

    #[test]
    fn auth_required_is_not_forbidden() {
        assert!(!GitHubError::AuthRequired.is_forbidden());
    }
}
