//! Application configuration for RepoSheet.
//!
//! User config lives at `~/.reposheet/reposheet.toml`. The file is
//! optional; CLI flags override config file values, which override
//! defaults. The tool never writes the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RepoSheetError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "reposheet.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".reposheet";

/// Fixed base origin the listing's relative links resolve against.
pub const DEFAULT_BASE_URL: &str = "https://github.com";

// ---------------------------------------------------------------------------
// Config structs (matching reposheet.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Politeness delay between listing-page fetches, in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Politeness delay between README fetches, in milliseconds.
    #[serde(default = "default_readme_delay_ms")]
    pub readme_delay_ms: u64,

    /// Concurrent README fetches. 1 preserves the sequential baseline.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Upper bound on listing pages followed. 0 means unbounded.
    #[serde(default)]
    pub max_pages: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            page_delay_ms: default_page_delay_ms(),
            readme_delay_ms: default_readme_delay_ms(),
            concurrency: default_concurrency(),
            max_pages: 0,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_page_delay_ms() -> u64 {
    500
}
fn default_readme_delay_ms() -> u64 {
    250
}
fn default_concurrency() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Scrape config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scrape configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base origin relative listing links resolve against.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Politeness delay between listing-page fetches.
    pub page_delay: Duration,
    /// Politeness delay between README fetches.
    pub readme_delay: Duration,
    /// Concurrent README fetches. 1 preserves the sequential baseline.
    pub concurrency: u32,
    /// Upper bound on listing pages followed. 0 means unbounded.
    pub max_pages: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ScrapeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL"),
            timeout: Duration::from_secs(config.defaults.timeout_secs),
            page_delay: Duration::from_millis(config.defaults.page_delay_ms),
            readme_delay: Duration::from_millis(config.defaults.readme_delay_ms),
            concurrency: config.defaults.concurrency.max(1),
            max_pages: config.defaults.max_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.reposheet/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RepoSheetError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.reposheet/reposheet.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RepoSheetError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| RepoSheetError::config(format!("failed to parse {}: {e}", path.display())))
}
