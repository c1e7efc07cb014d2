//! Pagination driver: walks the repository listing until exhausted.
//!
//! Never fails at this boundary. A fetch failure aborts pagination and
//! returns whatever has been accumulated so far; the caller treats zero
//! repositories from the first page as "no repositories for this
//! profile".

use std::collections::HashSet;

use tracing::{info, warn};
use url::Url;

use reposheet_shared::{CancelToken, RepoDescriptor, ScrapeConfig};

use crate::fetch::Fetcher;
use crate::listing::parse_listing;

/// Repository-listing view selector appended to the profile URL.
const LISTING_QUERY: &str = "tab=repositories";

/// Walk the profile's repository listing, following "next" links until
/// exhausted, and return the discovered repositories in discovery order.
///
/// A visited-URL guard stops the walk if the host ever returns a cyclic
/// "next" link, and `config.max_pages` (when non-zero) bounds the walk.
/// Cancellation is checked between page fetches.
pub async fn list_repositories(
    fetcher: &Fetcher,
    profile_url: &Url,
    config: &ScrapeConfig,
    cancel: &CancelToken,
) -> Vec<RepoDescriptor> {
    let mut all: Vec<RepoDescriptor> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();

    let mut current = Some(listing_url(profile_url));
    let mut pages_fetched: u32 = 0;

    while let Some(page_url) = current.take() {
        if cancel.is_cancelled() {
            info!(pages_fetched, "cancellation requested, stopping pagination");
            break;
        }
        if config.max_pages > 0 && pages_fetched >= config.max_pages {
            warn!(max_pages = config.max_pages, "listing page bound reached");
            break;
        }
        if !visited.insert(page_url.as_str().to_string()) {
            warn!(url = %page_url, "cyclic next link detected, stopping pagination");
            break;
        }

        pages_fetched += 1;
        info!(page = pages_fetched, url = %page_url, "scanning repository listing");

        let html = match fetcher.fetch(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                // Partial results, not a pipeline failure.
                warn!(url = %page_url, error = %e, "listing fetch failed, returning partial results");
                break;
            }
        };

        let page = parse_listing(&html, &config.base_url);
        if page.repos.is_empty() && pages_fetched == 1 {
            info!("no repositories on the first listing page");
        }
        all.extend(page.repos);

        if let Some(next) = page.next_page {
            tokio::time::sleep(config.page_delay).await;
            current = Some(next);
        }
    }

    all
}

/// Profile URL with the repository-listing view selector appended.
fn listing_url(profile_url: &Url) -> Url {
    let mut url = profile_url.clone();
    url.set_query(Some(LISTING_QUERY));
    url
}
