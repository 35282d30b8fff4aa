//! The normalized repository shape shared by the fetcher, the HTTP API,
//! and the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owner of a repository (user or organization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    /// Owner login (user or organization name).
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
}

/// A repository normalized down to the fields the dashboard consumes.
///
/// Constructed fresh on every fetch and replaced wholesale on refresh;
/// nothing is cached or persisted. Field names are the wire format of
/// `GET /api/github/repositories` and must stay as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRecord {
    /// Upstream numeric id, unique within a single fetch.
    pub id: u64,
    /// Short repository name.
    pub name: String,
    /// `{owner.login}/{name}`.
    pub full_name: String,
    /// Free-text description, absent for many repositories.
    pub description: Option<String>,
    /// Topic labels, empty when the source has none.
    #[serde(default)]
    pub topics: Vec<String>,
    pub owner: RepoOwner,
    pub private: bool,
    pub fork: bool,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub open_issues_count: u64,
    /// Repository size in kilobytes.
    pub size: u64,
    /// Primary language label, absent for repositories without code.
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub clone_url: String,
    pub git_url: String,
    pub ssh_url: String,
    pub default_branch: String,
}

impl RepoRecord {
    /// Recompute the canonical `owner/name` form.
    #[inline]
    #[must_use]
    pub fn canonical_full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}
