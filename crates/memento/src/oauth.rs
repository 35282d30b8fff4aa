//! GitHub OAuth Device Flow sign-in.
//!
//! 1. Request a device code from GitHub
//! 2. Show the user code and verification URL
//! 3. Poll the token endpoint until the user authorizes
//! 4. Hand the access token back to the caller for safekeeping
//!
//! ```ignore
//! use memento::oauth::DeviceAuthorization;
//!
//! let grant = DeviceAuthorization::request().await?;
//! println!("Visit {} and enter {}", grant.verification_uri, grant.user_code);
//! let token = grant.poll_token().await?;
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client ID of the MementoAI OAuth App. Public by design; it only
/// identifies the application to GitHub.
pub const CLIENT_ID: &str = "Ov23ctHkXQm4aPZn81Dw";

/// The dashboard lists private repositories and reads the user profile.
pub const SCOPE: &str = "repo read:user";

const DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// Errors during the device flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Authorization expired. Please try again.")]
    Expired,

    #[error("Authorization was denied by the user.")]
    AccessDenied,

    #[error("Invalid device code. Please restart sign-in.")]
    InvalidDeviceCode,

    #[error("GitHub error: {0}")]
    GitHub(String),
}

/// An in-progress device authorization.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAuthorization {
    /// Verification code sent back to GitHub while polling.
    pub device_code: String,
    /// Code the user enters at the verification URL.
    pub user_code: String,
    /// Where the user enters the code.
    pub verification_uri: String,
    /// Seconds until the device code expires.
    pub expires_in: u64,
    /// Minimum seconds between polls.
    pub interval: u64,
}

/// A granted access token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Granted scopes, space-separated.
    pub scope: String,
}

#[derive(Debug, Deserialize)]
struct PollError {
    error: String,
    error_description: Option<String>,
    #[serde(default)]
    interval: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PollResponse {
    Granted(AccessToken),
    Pending(PollError),
}

impl DeviceAuthorization {
    /// Start the flow with the default scope.
    pub async fn request() -> Result<Self, OAuthError> {
        Self::request_with_scope(SCOPE).await
    }

    /// Start the flow with an explicit scope.
    pub async fn request_with_scope(scope: &str) -> Result<Self, OAuthError> {
        let client = Client::new();

        let response = client
            .post(DEVICE_CODE_URL)
            .header("Accept", "application/json")
            .form(&[("client_id", CLIENT_ID), ("scope", scope)])
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OAuthError::GitHub(format!(
                "Failed to get device code: {text}"
            )));
        }

        response
            .json::<DeviceAuthorization>()
            .await
            .map_err(|e| OAuthError::Parse(e.to_string()))
    }

    /// Poll until the user authorizes, the code expires, or GitHub
    /// rejects the grant.
    pub async fn poll_token(&self) -> Result<AccessToken, OAuthError> {
        let client = Client::new();
        let mut interval = Duration::from_secs(self.interval);
        let deadline = std::time::Instant::now() + Duration::from_secs(self.expires_in);

        loop {
            if std::time::Instant::now() >= deadline {
                return Err(OAuthError::Expired);
            }

            tokio::time::sleep(interval).await;

            let response = client
                .post(TOKEN_URL)
                .header("Accept", "application/json")
                .form(&[
                    ("client_id", CLIENT_ID),
                    ("device_code", self.device_code.as_str()),
                    ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(OAuthError::GitHub(format!("Token request failed: {text}")));
            }

            let poll: PollResponse = response
                .json()
                .await
                .map_err(|e| OAuthError::Parse(e.to_string()))?;

            match poll {
                PollResponse::Granted(token) => return Ok(token),
                PollResponse::Pending(err) => match err.error.as_str() {
                    "authorization_pending" => continue,
                    "slow_down" => {
                        // GitHub may dictate a new interval; otherwise back
                        // off by the documented 5 seconds.
                        interval = err
                            .interval
                            .map(Duration::from_secs)
                            .unwrap_or(interval + Duration::from_secs(5));
                        continue;
                    }
                    "expired_token" => return Err(OAuthError::Expired),
                    "access_denied" => return Err(OAuthError::AccessDenied),
                    "incorrect_device_code" => return Err(OAuthError::InvalidDeviceCode),
                    _ => {
                        return Err(OAuthError::GitHub(
                            err.error_description.unwrap_or(err.error),
                        ));
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_authorization_deserializes() {
        let json = r#"{
            "device_code": "abc123",
            "user_code": "ABCD-1234",
            "verification_uri": "https://github.com/login/device",
            "expires_in": 900,
            "interval": 5
        }"#;

        let grant: DeviceAuthorization = serde_json::from_str(json).unwrap();
        assert_eq!(grant.user_code, "ABCD-1234");
        assert_eq!(grant.interval, 5);
    }

    #[test]
    fn granted_token_wins_over_pending_shape() {
        let json = r#"{
            "access_token": "gho_xxxxxxxxxxxx",
            "token_type": "bearer",
            "scope": "repo read:user"
        }"#;

        let poll: PollResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(poll, PollResponse::Granted(t) if t.access_token == "gho_xxxxxxxxxxxx"));
    }

    #[test]
    fn pending_error_deserializes_with_optional_interval() {
        let json = r#"{ "error": "slow_down", "interval": 10 }"#;

        let poll: PollResponse = serde_json::from_str(json).unwrap();
        match poll {
            PollResponse::Pending(err) => {
                assert_eq!(err.error, "slow_down");
                assert_eq!(err.interval, Some(10));
                assert!(err.error_description.is_none());
            }
            PollResponse::Granted(_) => panic!("expected pending"),
        }
    }

    #[test]
    fn scope_covers_private_repos_and_profile() {
        assert!(SCOPE.contains("repo"));
        assert!(SCOPE.contains("read:user"));
    }
}
