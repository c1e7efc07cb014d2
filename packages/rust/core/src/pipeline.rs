//! End-to-end scrape pipeline: profile URL → listing → README enrichment → table.
//!
//! Once a profile URL has been accepted the pipeline has no fatal-error
//! exit path: per-item failures are absorbed into sentinel values or
//! partial results, and the run always returns a table.

use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use url::Url;

use reposheet_scraper::{Fetcher, fetch_readme, list_repositories};
use reposheet_shared::{
    CancelToken, RepoDescriptor, RepoRecord, Result, ResultTable, ScrapeConfig, project_name,
};

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each repository's README has been handled.
    fn repo_scraped(&self, completed: usize, total: usize, name: &str);
    /// Called when the pipeline completes, with the final row count.
    fn done(&self, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn repo_scraped(&self, _completed: usize, _total: usize, _name: &str) {}
    fn done(&self, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full scrape pipeline for one profile URL.
///
/// 1. Walk the repository listing (pagination)
/// 2. Fetch and extract each repository's README
/// 3. Assemble the result table in discovery order
///
/// Zero discovered repositories is a valid terminal state, not an error;
/// so is input that does not parse as a URL at all. The only error this
/// returns is failure to construct the HTTP client.
#[instrument(skip_all, fields(url = profile_url))]
pub async fn run_scrape(
    profile_url: &str,
    config: &ScrapeConfig,
    cancel: &CancelToken,
    progress: &dyn ProgressReporter,
) -> Result<ResultTable> {
    let start = Instant::now();

    let Ok(url) = Url::parse(profile_url) else {
        warn!(profile_url, "input is not a usable URL, reporting no repositories");
        progress.done(0);
        return Ok(ResultTable::new());
    };

    let fetcher = Fetcher::new(config.timeout)?;

    progress.phase("Scanning repository listing");
    let descriptors = list_repositories(&fetcher, &url, config, cancel).await;

    if descriptors.is_empty() {
        info!("no repositories found");
        progress.done(0);
        return Ok(ResultTable::new());
    }

    progress.phase("Fetching READMEs");
    let table = if config.concurrency <= 1 {
        scrape_sequential(&fetcher, descriptors, config, cancel, progress).await
    } else {
        scrape_concurrent(&fetcher, descriptors, config, cancel, progress).await
    };

    progress.done(table.len());
    info!(
        rows = table.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "scrape complete"
    );

    Ok(table)
}

/// Baseline mode: one repository at a time, pausing between fetches.
async fn scrape_sequential(
    fetcher: &Fetcher,
    descriptors: Vec<RepoDescriptor>,
    config: &ScrapeConfig,
    cancel: &CancelToken,
    progress: &dyn ProgressReporter,
) -> ResultTable {
    let total = descriptors.len();
    let mut table = ResultTable::new();

    for (i, repo) in descriptors.into_iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(completed = i, total, "cancellation requested, returning partial table");
            break;
        }
        if i > 0 {
            tokio::time::sleep(config.readme_delay).await;
        }

        let name = project_name(&repo.url);
        let readme = fetch_readme(fetcher, &repo.url).await;
        table.push(RepoRecord {
            name: name.clone(),
            kind: repo.kind,
            url: repo.url.to_string(),
            readme,
        });
        progress.repo_scraped(table.len(), total, &name);
    }

    table
}

/// Bounded-worker mode: README fetches fan out through an order-preserving
/// buffered stream; the shared [`Pacer`] keeps the politeness budget.
///
/// Each repository is fetched exactly once, and the assembled table matches
/// discovery order regardless of completion order.
async fn scrape_concurrent(
    fetcher: &Fetcher,
    descriptors: Vec<RepoDescriptor>,
    config: &ScrapeConfig,
    cancel: &CancelToken,
    progress: &dyn ProgressReporter,
) -> ResultTable {
    let total = descriptors.len();
    let pacer = Pacer::new(config.readme_delay);

    let mut results = futures::stream::iter(descriptors.into_iter().map(|repo| {
        let pacer = &pacer;
        async move {
            if cancel.is_cancelled() {
                return None;
            }
            pacer.wait().await;

            let name = project_name(&repo.url);
            let readme = fetch_readme(fetcher, &repo.url).await;
            Some(RepoRecord {
                name,
                kind: repo.kind,
                url: repo.url.to_string(),
                readme,
            })
        }
    }))
    .buffered(config.concurrency as usize);

    let mut table = ResultTable::new();
    while let Some(result) = results.next().await {
        let Some(record) = result else {
            warn!(completed = table.len(), total, "cancellation requested, returning partial table");
            break;
        };
        let name = record.name.clone();
        table.push(record);
        progress.repo_scraped(table.len(), total, &name);
    }

    table
}

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/// Spaces out request starts so the politeness budget holds across workers.
struct Pacer {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl Pacer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Wait for this worker's slot, then push the next slot out by one
    /// interval.
    async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        let wake = {
            let mut slot = self.next_slot.lock().await;
            let wake = (*slot).max(Instant::now());
            *slot = wake + self.interval;
            wake
        };
        tokio::time::sleep_until(wake.into()).await;
    }
}
