//! HTTP fetching with typed failure results.
//!
//! One outbound request per call; no retries at this layer. Retry policy,
//! if any, belongs to the orchestrator.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use reposheet_shared::{RepoSheetError, Result};

/// User-Agent string for scrape requests.
const USER_AGENT: &str = concat!("RepoSheet/", env!("CARGO_PKG_VERSION"));

/// HTTP fetcher wrapping a shared client with a per-request timeout.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build the shared HTTP client.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| RepoSheetError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Perform a single GET and return the response body.
    ///
    /// Transport, DNS, TLS, timeout, and non-success status all collapse
    /// into [`RepoSheetError::Network`]; nothing panics across this
    /// boundary.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| RepoSheetError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepoSheetError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| RepoSheetError::Network(format!("{url}: body read failed: {e}")))
    }
}
