//! Listing-page parsing: repository entries and the "next" pagination link.
//!
//! All structural selectors for the profile listing live in this module so
//! a host markup change touches nothing else. The markup contract is:
//! a `div#user-repositories-list` container with one `li` per repository,
//! each carrying an `h3 > a` heading link and, for forks, a `span`
//! containing the "Forked from" marker; pagination is an `a[rel="next"]`
//! anchor.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use reposheet_shared::{RepoDescriptor, RepoKind};

/// Marker text identifying a forked repository on the listing.
///
/// Case-sensitive substring match, as observed on the source markup.
const FORK_MARKER: &str = "Forked from";

/// One parsed listing page: repositories in page order plus the next link.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Repositories in within-page order.
    pub repos: Vec<RepoDescriptor>,
    /// Absolute URL of the next listing page, if pagination continues.
    pub next_page: Option<Url>,
}

/// Parse one listing page's HTML.
///
/// Items without a heading link are skipped silently; relative hrefs are
/// resolved against `base`. `next_page` is `None` when pagination has
/// ended.
pub fn parse_listing(html: &str, base: &Url) -> ListingPage {
    let doc = Html::parse_document(html);

    let item_sel = Selector::parse("div#user-repositories-list li").unwrap();
    let link_sel = Selector::parse("h3 > a").unwrap();
    let span_sel = Selector::parse("span").unwrap();
    let next_sel = Selector::parse(r#"a[rel="next"]"#).unwrap();

    let mut repos = Vec::new();
    for item in doc.select(&item_sel) {
        let Some(link) = item.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href) else {
            debug!(href, "skipping unresolvable repository link");
            continue;
        };

        let is_fork = item
            .select(&span_sel)
            .any(|span| span.text().any(|t| t.contains(FORK_MARKER)));
        let kind = if is_fork {
            RepoKind::Fork
        } else {
            RepoKind::Original
        };

        repos.push(RepoDescriptor { url, kind });
    }

    let next_page = doc
        .select(&next_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| base.join(href).ok());

    ListingPage { repos, next_page }
}
