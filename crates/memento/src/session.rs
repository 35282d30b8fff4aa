//! The session shape the fetcher and the dashboard header consume.

use serde::{Deserialize, Serialize};

/// Signed-in user identity, as the dashboard header renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub avatar_url: String,
}

/// An authenticated session: an opaque access token plus the identity it
/// belongs to. Issuance and storage of either are someone else's problem;
/// this is only the shape callers hand in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    /// A session carrying only a token (identity resolved lazily).
    #[must_use]
    pub fn from_token(token: Option<String>) -> Self {
        Self {
            access_token: token,
            user: None,
        }
    }

    /// Whether a credential is present at all.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_presence_defines_authentication() {
        assert!(!Session::default().is_authenticated());
        assert!(!Session::from_token(None).is_authenticated());
        assert!(Session::from_token(Some("gho_abc".to_string())).is_authenticated());
    }
}
