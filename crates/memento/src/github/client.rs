//! GitHub API client creation and the authenticated-repository fetch.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;

use super::convert::to_repo_record;
use super::error::{GitHubError, classify_api_error};
use crate::record::RepoRecord;

/// Repositories requested per page. GitHub caps `per_page` at 100.
pub const PAGE_SIZE: usize = 100;

/// Identity of the authenticated user, for the dashboard header.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ViewerInfo {
    /// Login name.
    pub login: String,
    /// Display name, when the profile has one.
    pub name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: String,
}

/// Source of the authenticated identity's repository list.
///
/// The HTTP API depends on this trait rather than on [`GitHubClient`]
/// directly so the endpoint contract can be exercised without a network.
#[async_trait]
pub trait RepoLister: Send + Sync {
    /// Every repository visible to the identity (owner or collaborator),
    /// most-recently-updated first, all pages drained. All-or-nothing:
    /// a failure on any page yields no partial result.
    async fn list_repositories(&self) -> Result<Vec<RepoRecord>, GitHubError>;

    /// The authenticated identity itself.
    async fn viewer(&self) -> Result<ViewerInfo, GitHubError>;
}

/// Create an authenticated Octocrab instance from an access token.
pub fn create_client(token: &str) -> Result<Octocrab, GitHubError> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(classify_api_error)
}

/// GitHub-backed implementation of [`RepoLister`].
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
}

impl GitHubClient {
    /// Build a client from an access token.
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        Ok(Self {
            inner: Arc::new(create_client(token)?),
        })
    }

    /// Get a reference to the inner Octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.inner
    }

    /// Check the core rate limit and fail fast when it is exhausted.
    pub async fn check_rate_limit(&self) -> Result<(), GitHubError> {
        let rate_limit = self
            .inner
            .ratelimit()
            .get()
            .await
            .map_err(classify_api_error)?;
        let core = &rate_limit.resources.core;

        if core.remaining == 0 {
            let reset_at =
                DateTime::from_timestamp(core.reset as i64, 0).unwrap_or_else(Utc::now);
            return Err(GitHubError::Forbidden {
                reset_at: Some(reset_at),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl RepoLister for GitHubClient {
    async fn list_repositories(&self) -> Result<Vec<RepoRecord>, GitHubError> {
        let mut records: Vec<RepoRecord> = Vec::new();
        let mut page = 1u32;

        loop {
            self.check_rate_limit().await?;

            // visibility=all + affiliation=owner,collaborator widens the
            // listing beyond owned repos; sort=updated is the upstream
            // ordering the dashboard defaults to.
            let route = format!(
                "/user/repos?visibility=all&affiliation=owner,collaborator\
                 &sort=updated&per_page={PAGE_SIZE}&page={page}"
            );

            let batch: Vec<octocrab::models::Repository> = self
                .inner
                .get(route, None::<&()>)
                .await
                .map_err(classify_api_error)?;

            let count = batch.len();
            records.extend(batch.iter().map(to_repo_record));

            tracing::debug!(page, count, total = records.len(), "fetched repository page");

            // A short page means the listing is drained.
            if count < PAGE_SIZE {
                break;
            }

            page += 1;
        }

        Ok(records)
    }

    async fn viewer(&self) -> Result<ViewerInfo, GitHubError> {
        let user: serde_json::Value = self
            .inner
            .get("/user", None::<&()>)
            .await
            .map_err(classify_api_error)?;

        Ok(ViewerInfo {
            login: user
                .get("login")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            name: user.get("name").and_then(|v| v.as_str()).map(String::from),
            avatar_url: user
                .get("avatar_url")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }
}
