//! Pipeline orchestration and result caching for RepoSheet.
//!
//! This crate provides:
//! - [`pipeline`] — the end-to-end scrape run and progress reporting
//! - [`cache`] — process-lifetime memoization keyed by profile URL

pub mod cache;
pub mod pipeline;

pub use cache::ResultCache;
pub use pipeline::{ProgressReporter, SilentProgress, run_scrape};
