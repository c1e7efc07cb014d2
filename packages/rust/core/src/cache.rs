//! Process-lifetime memoization of pipeline runs.
//!
//! The cache is injected as an explicit collaborator owned by the process
//! entry point, never a module-level singleton, so the orchestrator stays
//! testable without it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use reposheet_shared::{CacheEntry, CancelToken, RepoSheetError, Result, ResultTable, ScrapeConfig};

use crate::pipeline::{ProgressReporter, run_scrape};

/// Memoizes full pipeline runs keyed by the literal input profile URL.
///
/// No canonicalization: two syntactically different URLs for the same
/// profile are distinct entries. No eviction, no TTL, no size bound;
/// valid for a single long-running process instance.
#[derive(Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CacheEntry>>>>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `profile_url`, running the pipeline on a
    /// miss.
    ///
    /// A hit performs no network activity. Concurrent calls for the same
    /// key run the pipeline at most once; the losers wait for the winner's
    /// entry.
    pub async fn get_or_run(
        &self,
        profile_url: &str,
        config: &ScrapeConfig,
        cancel: &CancelToken,
        progress: &dyn ProgressReporter,
    ) -> Result<ResultTable> {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(profile_url.to_string()).or_default().clone()
        };

        if let Some(entry) = cell.get() {
            debug!(key = profile_url, created_at = %entry.created_at, "cache hit");
            return Ok(entry.table.clone());
        }

        let entry = cell
            .get_or_try_init(|| async {
                info!(key = profile_url, "cache miss, running pipeline");
                let table = run_scrape(profile_url, config, cancel, progress).await?;
                Ok::<_, RepoSheetError>(CacheEntry {
                    table,
                    created_at: Utc::now(),
                })
            })
            .await?;

        Ok(entry.table.clone())
    }

    /// Number of completed entries currently stored.
    pub async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    /// Whether the cache holds no completed entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::pipeline::SilentProgress;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing_html(hrefs: &[&str]) -> String {
        let mut body = String::from(r#"<html><body><div id="user-repositories-list"><ul>"#);
        for href in hrefs {
            body.push_str(&format!(r#"<li><h3><a href="{href}">repo</a></h3></li>"#));
        }
        body.push_str("</ul></div></body></html>");
        body
    }

    fn test_config(server_uri: &str) -> ScrapeConfig {
        let mut config = ScrapeConfig::default();
        config.base_url = Url::parse(server_uri).unwrap();
        config.page_delay = Duration::ZERO;
        config.readme_delay = Duration::ZERO;
        config
    }

    async fn mount_profile(server: &MockServer, profile: &str, repo: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{profile}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing_html(&[&format!("/{profile}/{repo}")])),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/{profile}/{repo}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><article class="markdown-body">hi</article></body></html>"#,
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn second_call_hits_cache_without_network() {
        let server = MockServer::start().await;
        mount_profile(&server, "krasper", "alpha").await;

        let cache = ResultCache::new();
        let config = test_config(&server.uri());
        let cancel = CancelToken::new();
        let profile = format!("{}/krasper", server.uri());

        let first = cache
            .get_or_run(&profile, &config, &cancel, &SilentProgress)
            .await
            .unwrap();
        let requests_after_first = server.received_requests().await.unwrap().len();
        assert_eq!(requests_after_first, 2);

        let second = cache
            .get_or_run(&profile, &config, &cancel, &SilentProgress)
            .await
            .unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), requests_after_first);
        assert_eq!(first, second);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn distinct_keys_are_distinct_entries() {
        let server = MockServer::start().await;
        mount_profile(&server, "krasper", "alpha").await;

        let cache = ResultCache::new();
        let config = test_config(&server.uri());
        let cancel = CancelToken::new();

        // Same profile, different literal strings.
        let plain = format!("{}/krasper", server.uri());
        let slash = format!("{}/krasper/", server.uri());

        cache
            .get_or_run(&plain, &config, &cancel, &SilentProgress)
            .await
            .unwrap();
        cache
            .get_or_run(&slash, &config, &cancel, &SilentProgress)
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_calls_for_same_key_run_pipeline_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/krasper"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing_html(&["/krasper/alpha"]))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/krasper/alpha"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><article class="markdown-body">hi</article></body></html>"#,
            ))
            .mount(&server)
            .await;

        let cache = Arc::new(ResultCache::new());
        let config = test_config(&server.uri());
        let cancel = CancelToken::new();
        let profile = format!("{}/krasper", server.uri());

        let (a, b) = tokio::join!(
            cache.get_or_run(&profile, &config, &cancel, &SilentProgress),
            cache.get_or_run(&profile, &config, &cancel, &SilentProgress),
        );
        assert_eq!(a.unwrap(), b.unwrap());

        // One listing fetch and one README fetch total.
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
