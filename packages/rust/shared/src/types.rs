//! Core domain types for RepoSheet scrape runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Sentinel stored in a record whose repository page had no README.
pub const README_NOT_FOUND: &str = "README not found.";

/// Sentinel stored in a record whose repository page could not be fetched.
pub const README_FETCH_FAILED: &str = "Could not fetch README (request failed).";

// ---------------------------------------------------------------------------
// RepoKind
// ---------------------------------------------------------------------------

/// Classification of a repository on the profile listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepoKind {
    /// The account's own repository.
    Original,
    /// Marked "Forked from" another repository on the listing.
    Fork,
}

impl std::fmt::Display for RepoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoKind::Original => write!(f, "Original"),
            RepoKind::Fork => write!(f, "Fork"),
        }
    }
}

impl std::str::FromStr for RepoKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Original" => Ok(RepoKind::Original),
            "Fork" => Ok(RepoKind::Fork),
            other => Err(format!("unknown repository kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// RepoDescriptor
// ---------------------------------------------------------------------------

/// A repository discovered on the listing, prior to README enrichment.
///
/// The URL is always absolute, resolved from the page-relative heading link
/// during listing parsing. Immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    /// Absolute repository URL.
    pub url: Url,
    /// Original or fork, per the listing's marker text.
    pub kind: RepoKind,
}

/// Derive a project name from the last non-empty path segment of a URL.
///
/// `https://github.com/owner/my-repo` yields `my-repo`. Falls back to the
/// host when the path carries no segments at all.
pub fn project_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .unwrap_or_else(|| url.host_str().unwrap_or("unknown"))
        .to_string()
}

// ---------------------------------------------------------------------------
// RepoRecord / ResultTable
// ---------------------------------------------------------------------------

/// A fully enriched row in the final tabular output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    /// Project name, derived from the repository URL.
    pub name: String,
    /// Original or fork.
    pub kind: RepoKind,
    /// Absolute repository URL.
    pub url: String,
    /// README body text, or one of the sentinel strings.
    pub readme: String,
}

/// Ordered collection of [`RepoRecord`]s produced by one pipeline run.
///
/// Row order matches discovery order: pagination order, then within-page
/// order. An empty table is a valid terminal state (profile with no
/// repositories).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Rows in discovery order.
    pub rows: Vec<RepoRecord>,
}

impl ResultTable {
    /// Fixed column titles, in output order.
    pub const COLUMNS: [&'static str; 4] = ["Project Name", "Type", "URL", "README Content"];

    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, preserving insertion order.
    pub fn push(&mut self, record: RepoRecord) {
        self.rows.push(record);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CacheEntry
// ---------------------------------------------------------------------------

/// A memoized pipeline result, keyed by the literal input profile URL.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Snapshot of the completed run.
    pub table: ResultTable,
    /// When the run completed.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

/// Cooperative cancellation flag, checked between fetches.
///
/// Cancellation never tears down an in-flight request; the pipeline returns
/// whatever it has accumulated when it next observes the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_output_schema() {
        assert_eq!(RepoKind::Original.to_string(), "Original");
        assert_eq!(RepoKind::Fork.to_string(), "Fork");
        assert_eq!("Fork".parse::<RepoKind>().unwrap(), RepoKind::Fork);
        assert!("fork".parse::<RepoKind>().is_err());
    }

    #[test]
    fn project_name_from_last_segment() {
        let url = Url::parse("https://github.com/owner/my-repo").unwrap();
        assert_eq!(project_name(&url), "my-repo");
    }

    #[test]
    fn project_name_ignores_trailing_slash() {
        let url = Url::parse("https://github.com/owner/my-repo/").unwrap();
        assert_eq!(project_name(&url), "my-repo");
    }

    #[test]
    fn project_name_falls_back_to_host() {
        let url = Url::parse("https://github.com/").unwrap();
        assert_eq!(project_name(&url), "github.com");
    }

    #[test]
    fn table_preserves_insertion_order() {
        let mut table = ResultTable::new();
        for name in ["a", "b", "c"] {
            table.push(RepoRecord {
                name: name.into(),
                kind: RepoKind::Original,
                url: format!("https://github.com/owner/{name}"),
                readme: README_NOT_FOUND.into(),
            });
        }
        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn cancel_token_flips_once() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
