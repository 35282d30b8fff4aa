//! Normalization from raw GitHub API repositories to [`RepoRecord`].

use chrono::{DateTime, Utc};
use octocrab::models::Repository as GitHubRepo;

use crate::record::{RepoOwner, RepoRecord};

/// Convert a raw GitHub repository to the normalized record shape.
///
/// Fields the API may omit get stable fallbacks: counts become zero,
/// topics become an empty list, the default branch becomes `main`, and
/// missing timestamps collapse to the Unix epoch so they sort last under
/// the default most-recently-updated ordering. `full_name` is always
/// recomputed from the owner login and the name rather than trusted from
/// the payload.
pub fn to_repo_record(repo: &GitHubRepo) -> RepoRecord {
    let owner = repo
        .owner
        .as_ref()
        .map(|o| RepoOwner {
            login: o.login.clone(),
            avatar_url: o.avatar_url.to_string(),
        })
        .unwrap_or_else(|| RepoOwner {
            login: String::new(),
            avatar_url: String::new(),
        });

    let language = repo
        .language
        .as_ref()
        .and_then(|v| v.as_str().map(String::from));

    RepoRecord {
        id: repo.id.0,
        full_name: format!("{}/{}", owner.login, repo.name),
        name: repo.name.clone(),
        description: repo.description.clone(),
        topics: repo.topics.clone().unwrap_or_default(),
        owner,
        private: repo.private.unwrap_or(false),
        fork: repo.fork.unwrap_or(false),
        stargazers_count: repo.stargazers_count.unwrap_or(0) as u64,
        watchers_count: repo.watchers_count.unwrap_or(0) as u64,
        open_issues_count: repo.open_issues_count.unwrap_or(0) as u64,
        size: repo.size.unwrap_or(0) as u64,
        language,
        created_at: repo.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        updated_at: repo.updated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        html_url: display_or_empty(repo.html_url.as_ref()),
        clone_url: display_or_empty(repo.clone_url.as_ref()),
        git_url: display_or_empty(repo.git_url.as_ref()),
        ssh_url: display_or_empty(repo.ssh_url.as_ref()),
        default_branch: repo
            .default_branch
            .clone()
            .unwrap_or_else(|| "main".to_string()),
    }
}

fn display_or_empty<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn github_repo(value: serde_json::Value) -> GitHubRepo {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn normalizes_a_full_payload() {
        let repo = github_repo(json!({
            "id": 1296269,
            "name": "memento",
            "url": "https://api.github.com/repos/octocat/memento",
            "full_name": "stale/value",
            "description": "Coding memory layer",
            "owner": {
                "login": "octocat",
                "id": 1,
                "node_id": "MDQ6VXNlcjE=",
                "avatar_url": "https://avatars.githubusercontent.com/u/1",
                "gravatar_id": "",
                "url": "https://api.github.com/users/octocat",
                "html_url": "https://github.com/octocat",
                "followers_url": "https://api.github.com/users/octocat/followers",
                "following_url": "https://api.github.com/users/octocat/following{/other_user}",
                "gists_url": "https://api.github.com/users/octocat/gists{/gist_id}",
                "starred_url": "https://api.github.com/users/octocat/starred{/owner}{/repo}",
                "subscriptions_url": "https://api.github.com/users/octocat/subscriptions",
                "organizations_url": "https://api.github.com/users/octocat/orgs",
                "repos_url": "https://api.github.com/users/octocat/repos",
                "events_url": "https://api.github.com/users/octocat/events{/privacy}",
                "received_events_url": "https://api.github.com/users/octocat/received_events",
                "type": "User",
                "site_admin": false
            },
            "private": true,
            "fork": false,
            "stargazers_count": 9,
            "watchers_count": 4,
            "open_issues_count": 2,
            "size": 512,
            "language": "Rust",
            "topics": ["ai", "agents"],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-06-01T12:00:00Z",
            "html_url": "https://github.com/octocat/memento",
            "clone_url": "https://github.com/octocat/memento.git",
            "git_url": "git://github.com/octocat/memento.git",
            "ssh_url": "git@github.com:octocat/memento.git",
            "default_branch": "trunk"
        }));

        let record = to_repo_record(&repo);

        assert_eq!(record.id, 1296269);
        assert_eq!(record.name, "memento");
        // full_name is recomputed, never trusted from the payload.
        assert_eq!(record.full_name, "octocat/memento");
        assert_eq!(record.owner.login, "octocat");
        assert!(record.private);
        assert!(!record.fork);
        assert_eq!(record.stargazers_count, 9);
        assert_eq!(record.watchers_count, 4);
        assert_eq!(record.open_issues_count, 2);
        assert_eq!(record.size, 512);
        assert_eq!(record.language.as_deref(), Some("Rust"));
        assert_eq!(record.topics, vec!["ai", "agents"]);
        assert_eq!(record.default_branch, "trunk");
        assert_eq!(record.ssh_url, "git@github.com:octocat/memento.git");
        assert_eq!(record.updated_at.to_rfc3339(), "2024-06-01T12:00:00+00:00");
    }

    #[test]
    fn applies_fallbacks_for_a_sparse_payload() {
        let repo = github_repo(json!({
            "id": 7,
            "name": "bare",
            "url": "https://api.github.com/repos/bare"
        }));

        let record = to_repo_record(&repo);

        assert_eq!(record.id, 7);
        assert_eq!(record.full_name, "/bare");
        assert!(record.description.is_none());
        assert!(record.topics.is_empty());
        assert!(!record.private);
        assert!(!record.fork);
        assert_eq!(record.stargazers_count, 0);
        assert_eq!(record.size, 0);
        assert!(record.language.is_none());
        assert_eq!(record.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(record.updated_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(record.html_url, "");
        assert_eq!(record.default_branch, "main");
    }

    #[test]
    fn language_must_be_a_string_label() {
        // The API reports `language` as null for repositories without code.
        let repo = github_repo(json!({
            "id": 8,
            "name": "empty",
            "url": "https://api.github.com/repos/empty",
            "language": null
        }));

        assert!(to_repo_record(&repo).language.is_none());
    }
}
