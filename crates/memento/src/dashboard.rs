//! The repository browser view-model.
//!
//! Everything here is a pure function of `(records, query)` so the
//! dashboard behaves identically whichever surface renders it: filtering,
//! sorting, and aggregation never touch the network or any hidden state.
//! [`Dashboard`] adds the small load-state machine around refresh.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RepoRecord;

/// Sort order for the repository listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently updated first (the upstream ordering).
    #[default]
    Updated,
    /// Highest star count first.
    Stars,
    /// Name, ascending.
    Name,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Updated => "updated",
            SortKey::Stars => "stars",
            SortKey::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "updated" => Ok(SortKey::Updated),
            "stars" => Ok(SortKey::Stars),
            "name" => Ok(SortKey::Name),
            other => Err(format!(
                "unknown sort key '{other}' (expected updated, stars, or name)"
            )),
        }
    }
}

/// The three independent criteria the browser lets the user vary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoQuery {
    /// Free-text search; empty matches everything.
    pub search: String,
    /// Exact language filter; `None` means "all languages".
    pub language: Option<String>,
    pub sort: SortKey,
}

impl RepoQuery {
    /// Whether a record passes the search and language criteria.
    ///
    /// The search term matches case-insensitively against the name or the
    /// description; a record without a description only matches on name.
    /// The language filter is an exact, case-sensitive equality check.
    #[must_use]
    pub fn matches(&self, record: &RepoRecord) -> bool {
        let matches_search = if self.search.is_empty() {
            true
        } else {
            let needle = self.search.to_lowercase();
            record.name.to_lowercase().contains(&needle)
                || record
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        };

        let matches_language = match &self.language {
            None => true,
            Some(filter) => record.language.as_deref() == Some(filter.as_str()),
        };

        matches_search && matches_language
    }
}

/// Compare two records under a sort key.
///
/// Equal keys return `Ordering::Equal`, which together with a stable sort
/// keeps ties in input order.
fn compare(sort: SortKey, a: &RepoRecord, b: &RepoRecord) -> Ordering {
    match sort {
        SortKey::Updated => b.updated_at.cmp(&a.updated_at),
        SortKey::Stars => b.stargazers_count.cmp(&a.stargazers_count),
        // Lowercase folding approximates locale-aware comparison without
        // dragging in a collation library.
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Derive the filtered, sorted view of a record sequence.
///
/// The input is untouched; the view borrows from it. With an empty search
/// and no language filter the filter step is the identity.
#[must_use]
pub fn filtered_view<'a>(records: &'a [RepoRecord], query: &RepoQuery) -> Vec<&'a RepoRecord> {
    let mut view: Vec<&RepoRecord> = records.iter().filter(|r| query.matches(r)).collect();
    // Vec::sort_by is stable, which the tie-order contract relies on.
    view.sort_by(|a, b| compare(query.sort, a, b));
    view
}

/// Summary statistics over the full (unfiltered) record sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    /// Total repository count.
    pub total_repos: usize,
    /// Count of distinct non-absent language labels.
    pub languages: usize,
    /// Sum of star counts.
    pub total_stars: u64,
    /// Count of repositories that are not forks.
    pub original_repos: usize,
}

/// Compute aggregates over the full sequence, independent of any filter.
#[must_use]
pub fn aggregates(records: &[RepoRecord]) -> Aggregates {
    let mut languages = HashSet::new();
    let mut total_stars = 0u64;
    let mut original_repos = 0usize;

    for record in records {
        if let Some(language) = &record.language {
            languages.insert(language.as_str());
        }
        total_stars += record.stargazers_count;
        if !record.fork {
            original_repos += 1;
        }
    }

    Aggregates {
        total_repos: records.len(),
        languages: languages.len(),
        total_stars,
        original_repos,
    }
}

/// Distinct non-absent language labels in first-seen order.
#[must_use]
pub fn unique_languages(records: &[RepoRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.language.as_deref())
        .filter(|lang| seen.insert(*lang))
        .collect()
}

/// What an empty (or non-empty) filtered view means.
///
/// An account with zero repositories is reported differently from a
/// filter that matched nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// The filtered view has this many entries.
    Matches(usize),
    /// The account has repositories but none pass the current filter.
    NoMatches,
    /// The account has no repositories at all.
    NoRepositories,
}

/// Classify a view against the full sequence it was derived from.
#[must_use]
pub fn classify(total: usize, visible: usize) -> ListOutcome {
    if total == 0 {
        ListOutcome::NoRepositories
    } else if visible == 0 {
        ListOutcome::NoMatches
    } else {
        ListOutcome::Matches(visible)
    }
}

/// Render an update timestamp the way the dashboard shows it.
///
/// Floor division at the 7/30/365-day boundaries, so 13 days is
/// "1 week ago" and 45 days is "1 month ago".
#[must_use]
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = now.signed_duration_since(timestamp).num_days();

    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => plural(days / 7, "week"),
        30..=364 => plural(days / 30, "month"),
        _ => plural(days / 365, "year"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// The browser state: the full sequence plus the current query and the
/// refresh flag.
///
/// Refresh semantics are last-write-wins: whichever fetch completes last
/// replaces the sequence, regardless of start order. A failed refresh
/// keeps whatever was previously loaded and logs the error; nothing
/// retries automatically.
#[derive(Debug, Default)]
pub struct Dashboard {
    records: Vec<RepoRecord>,
    query: RepoQuery,
    loading: bool,
}

impl Dashboard {
    #[must_use]
    pub fn new(query: RepoQuery) -> Self {
        Self {
            records: Vec::new(),
            query,
            loading: false,
        }
    }

    /// While loading, no repository data is rendered.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn query(&self) -> &RepoQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: RepoQuery) {
        self.query = query;
    }

    /// The full, unfiltered sequence currently held.
    #[must_use]
    pub fn records(&self) -> &[RepoRecord] {
        &self.records
    }

    /// Enter the loading state ahead of a fetch.
    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Apply a completed fetch.
    ///
    /// Success replaces the entire sequence; failure leaves the previous
    /// data in place. Either way the loading state ends.
    pub fn finish_refresh<E: fmt::Display>(&mut self, result: Result<Vec<RepoRecord>, E>) {
        match result {
            Ok(records) => self.records = records,
            Err(e) => tracing::error!("failed to fetch repositories: {e}"),
        }
        self.loading = false;
    }

    /// The filtered, sorted view under the current query.
    #[must_use]
    pub fn view(&self) -> Vec<&RepoRecord> {
        filtered_view(&self.records, &self.query)
    }

    /// Aggregates over the full sequence, unaffected by the query.
    #[must_use]
    pub fn stats(&self) -> Aggregates {
        aggregates(&self.records)
    }

    /// Empty-result classification for the current view.
    #[must_use]
    pub fn outcome(&self) -> ListOutcome {
        classify(self.records.len(), self.view().len())
    }
}
