//! Listing discovery and README extraction for RepoSheet.
//!
//! This crate provides:
//! - [`Fetcher`] — HTTP fetching with typed failure results
//! - [`listing`] — listing-page parsing (repository entries + next link)
//! - [`readme`] — README body extraction with sentinel degradation
//! - [`pagination`] — the listing walk across "next" links
//!
//! All structural selectors for the host's markup live in [`listing`] and
//! [`readme`]; the orchestrator and data model never see HTML.

pub mod fetch;
pub mod listing;
pub mod pagination;
pub mod readme;

pub use fetch::Fetcher;
pub use listing::{ListingPage, parse_listing};
pub use pagination::list_repositories;
pub use readme::{extract_readme, fetch_readme};
