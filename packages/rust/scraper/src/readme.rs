//! README extraction from a repository page.
//!
//! The rendered README body is the `article.markdown-body` element. A
//! missing element and a failed fetch are distinct outcomes, encoded as
//! the two sentinel strings; neither raises past this boundary.

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

use reposheet_shared::{README_FETCH_FAILED, README_NOT_FOUND};

use crate::fetch::Fetcher;

/// Extract the rendered README body text from a repository page.
///
/// Returns `None` when the page has no README container. Inter-element
/// whitespace is collapsed to single spaces and the ends are trimmed.
pub fn extract_readme(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let article_sel = Selector::parse("article.markdown-body").unwrap();

    let article = doc.select(&article_sel).next()?;
    let joined = article.text().collect::<Vec<_>>().join(" ");
    Some(joined.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Fetch a repository page and extract its README, degrading failures to
/// sentinel values.
pub async fn fetch_readme(fetcher: &Fetcher, url: &Url) -> String {
    match fetcher.fetch(url).await {
        Ok(html) => extract_readme(&html).unwrap_or_else(|| README_NOT_FOUND.to_string()),
        Err(e) => {
            warn!(%url, error = %e, "repository page fetch failed");
            README_FETCH_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn extracts_and_collapses_whitespace() {
        let text = extract_readme(&load_fixture("repo_with_readme.html")).unwrap();
        assert_eq!(
            text,
            "Alpha Tool Alpha does things quickly. Install with cargo install alpha-tool fast small"
        );
    }

    #[test]
    fn missing_container_yields_none() {
        assert!(extract_readme(&load_fixture("repo_without_readme.html")).is_none());
        assert!(extract_readme("<html><body></body></html>").is_none());
    }

    #[tokio::test]
    async fn fetch_readme_uses_not_found_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/o/bare"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>no readme here</p></body></html>"),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/o/bare", server.uri())).unwrap();
        assert_eq!(fetch_readme(&fetcher, &url).await, README_NOT_FOUND);
    }

    #[tokio::test]
    async fn fetch_readme_uses_fetch_failed_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/o/broken", server.uri())).unwrap();
        assert_eq!(fetch_readme(&fetcher, &url).await, README_FETCH_FAILED);
    }
}
