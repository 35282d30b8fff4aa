//! Memento - GitHub repository dashboard core.
//!
//! This library backs MementoAI's repository dashboard: it fetches every
//! repository visible to an authenticated GitHub identity, normalizes the
//! raw API payloads into a fixed record shape, and derives the filtered,
//! sorted, aggregated views the dashboard renders.
//!
//! # Example
//!
//! ```ignore
//! use memento::dashboard::{Dashboard, RepoQuery};
//! use memento::github::{GitHubClient, RepoLister};
//!
//! let client = GitHubClient::new(&token)?;
//! let mut dashboard = Dashboard::new(RepoQuery::default());
//!
//! dashboard.begin_refresh();
//! dashboard.finish_refresh(client.list_repositories().await);
//!
//! let stats = dashboard.stats();
//! let visible = dashboard.view();
//! ```

pub mod api;
pub mod dashboard;
pub mod github;
pub mod oauth;
pub mod record;
pub mod session;
pub mod theme;

pub use api::{ApiError, ApiState, router};
pub use dashboard::{Aggregates, Dashboard, ListOutcome, RepoQuery, SortKey};
pub use github::{GitHubClient, GitHubError, RepoLister, ViewerInfo};
pub use record::{RepoOwner, RepoRecord};
pub use session::{Session, SessionUser};
