//! GitHub API client for the repository fetcher.
//!
//! # Module Structure
//!
//! - [`error`] - Error taxonomy for fetch operations
//! - [`client`] - Client creation and the paginated repository listing
//! - [`convert`] - Normalization of raw API payloads to [`RepoRecord`]
//!
//! ```ignore
//! use memento::github::{GitHubClient, RepoLister};
//!
//! let client = GitHubClient::new(&token)?;
//! let repos = client.list_repositories().await?;
//! ```
//!
//! [`RepoRecord`]: crate::record::RepoRecord

mod client;
mod convert;
mod error;

pub use client::{GitHubClient, PAGE_SIZE, RepoLister, ViewerInfo, create_client};
pub use convert::to_repo_record;
pub use error::{GitHubError, classify_api_error};
