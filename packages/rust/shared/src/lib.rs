//! Shared types, error model, and configuration for RepoSheet.
//!
//! This crate is the foundation depended on by all other RepoSheet crates.
//! It provides:
//! - [`RepoSheetError`] — the unified error type
//! - Domain types ([`RepoDescriptor`], [`RepoRecord`], [`ResultTable`], [`RepoKind`])
//! - Configuration ([`AppConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_BASE_URL, DefaultsConfig, ScrapeConfig, config_dir, config_file_path,
    load_config, load_config_from,
};
pub use error::{RepoSheetError, Result};
pub use types::{
    CacheEntry, CancelToken, README_FETCH_FAILED, README_NOT_FOUND, RepoDescriptor, RepoKind,
    RepoRecord, ResultTable, project_name,
};
