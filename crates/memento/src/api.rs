//! The HTTP surface of the dashboard: repository listing and session
//! identity.
//!
//! Failure mapping follows the endpoint contract: a missing credential is
//! rejected with 401 before any upstream call; an upstream credential
//! rejection is also 401; rate-limit or permission failures are 403; and
//! anything else collapses into a 500. Every error body is
//! `{ "error": <string> }`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use thiserror::Error;

use crate::github::{GitHubError, RepoLister, ViewerInfo};
use crate::record::RepoRecord;
use crate::session::Session;

/// Shared state behind the API routes.
#[derive(Clone)]
pub struct ApiState {
    session: Session,
    lister: Option<Arc<dyn RepoLister>>,
}

impl ApiState {
    /// Build state from a session and, when a credential exists, the
    /// lister constructed for it.
    pub fn new(session: Session, lister: Option<Arc<dyn RepoLister>>) -> Self {
        Self { session, lister }
    }

    /// The lister, or the unauthenticated rejection when no credential
    /// was present.
    fn lister(&self) -> Result<&Arc<dyn RepoLister>, ApiError> {
        if !self.session.is_authenticated() {
            return Err(ApiError::NoCredential);
        }
        self.lister.as_ref().ok_or(ApiError::NoCredential)
    }
}

/// Errors the endpoints expose, each with a fixed status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized - No access token")]
    NoCredential,

    #[error("Unauthorized - Invalid or expired token")]
    CredentialRejected,

    #[error("Forbidden - API rate limit exceeded or insufficient permissions")]
    Forbidden,

    #[error("Failed to fetch repositories")]
    FetchFailed,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NoCredential | ApiError::CredentialRejected => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::FetchFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GitHubError> for ApiError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::AuthRequired => ApiError::CredentialRejected,
            GitHubError::Forbidden { .. } => ApiError::Forbidden,
            GitHubError::Api(_) | GitHubError::Internal(_) => ApiError::FetchFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Build the API router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/github/repositories", get(list_repositories))
        .route("/api/session", get(session_identity))
        .with_state(state)
}

/// `GET /api/github/repositories`: the full normalized listing.
async fn list_repositories(
    State(state): State<ApiState>,
) -> Result<Json<Vec<RepoRecord>>, ApiError> {
    let lister = state.lister()?;

    let records = lister.list_repositories().await.map_err(|e| {
        tracing::error!("error fetching repositories: {e}");
        ApiError::from(e)
    })?;

    Ok(Json(records))
}

/// `GET /api/session`: the signed-in identity for the dashboard header.
async fn session_identity(State(state): State<ApiState>) -> Result<Json<ViewerInfo>, ApiError> {
    let lister = state.lister()?;

    let viewer = lister.viewer().await.map_err(|e| {
        tracing::error!("error fetching viewer identity: {e}");
        ApiError::from(e)
    })?;

    Ok(Json(viewer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_contract() {
        assert_eq!(ApiError::NoCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::CredentialRejected.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::FetchFailed.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn fetch_errors_map_onto_api_errors() {
        assert!(matches!(
            ApiError::from(GitHubError::AuthRequired),
            ApiError::CredentialRejected
        ));
        assert!(matches!(
            ApiError::from(GitHubError::Forbidden { reset_at: None }),
            ApiError::Forbidden
        ));
        assert!(matches!(
            ApiError::from(GitHubError::Internal("boom".to_string())),
            ApiError::FetchFailed
        ));
    }
}
