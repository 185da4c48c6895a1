//! Scrape session orchestration.
//!
//! A session is a strictly sequential conversation with one page driver:
//! navigate to the starting feed, fail fast on a login redirect, collect
//! tweets with the scroll loop, then run the enrichment passes in fixed
//! order (truncation always; quotes and threads per options). Multiple
//! sessions may run in parallel only against separate browser contexts.

pub mod collect;
pub mod enrich;

use std::fmt;

use crate::config::{ScrapeOptions, BOOKMARKS_URL, INITIAL_LOAD_PAUSE, SEARCH_URL, SELECTOR_TIMEOUT};
use crate::error::ScrapeError;
use crate::models::{BookmarksResult, SearchResult, Tweet};
use crate::page::PageDriver;

/// Feed ordering for search scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    /// Ranked results (X's default tab).
    #[default]
    Top,
    /// Chronological results.
    Latest,
}

impl SearchFilter {
    /// Parse a filter name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "top" => Some(SearchFilter::Top),
            "latest" | "live" => Some(SearchFilter::Latest),
            _ => None,
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFilter::Top => write!(f, "top"),
            SearchFilter::Latest => write!(f, "latest"),
        }
    }
}

/// Build the search page URL for a query and filter.
fn build_search_url(query: &str, filter: SearchFilter) -> String {
    let filter_param = match filter {
        SearchFilter::Latest => "&f=live",
        SearchFilter::Top => "",
    };
    format!(
        "{SEARCH_URL}?q={}{filter_param}&src=typed_query",
        urlencoding::encode(query)
    )
}

/// Navigate to a feed page and wait for its first tweet.
///
/// A login redirect means the session cookies expired - that aborts the
/// whole session.
async fn open_feed(page: &dyn PageDriver, url: &str) -> Result<(), ScrapeError> {
    page.navigate(url).await?;

    let current = page.current_url().await?;
    if current.to_lowercase().contains("login") {
        return Err(ScrapeError::AuthExpired);
    }

    page.wait_for_content(SELECTOR_TIMEOUT).await?;
    page.sleep(INITIAL_LOAD_PAUSE).await;
    Ok(())
}

/// Run the enrichment passes in their fixed order.
async fn enrich_all(page: &dyn PageDriver, tweets: &mut [Tweet], options: &ScrapeOptions) {
    enrich::recover_truncated(page, tweets).await;
    if options.follow_quotes {
        enrich::follow_quotes(page, tweets).await;
    }
    if options.follow_threads {
        enrich::follow_threads(page, tweets).await;
    }
}

/// Scrape the authenticated user's bookmarks feed.
pub async fn scrape_bookmarks(
    page: &dyn PageDriver,
    options: &ScrapeOptions,
) -> Result<BookmarksResult, ScrapeError> {
    tracing::info!(
        count = options.count,
        max_scrolls = options.max_scrolls,
        "Scraping bookmarks"
    );

    open_feed(page, BOOKMARKS_URL).await?;

    let (mut tweets, scrolls) =
        collect::scroll_and_collect(page, options.count, options.max_scrolls).await?;
    enrich_all(page, &mut tweets, options).await;

    let total_scraped = tweets.len();
    tracing::info!(total_scraped, scrolls, "Bookmarks scrape complete");

    Ok(BookmarksResult {
        tweets,
        total_scraped,
        scrolls_performed: scrolls,
    })
}

/// Search X and scrape the result feed.
pub async fn scrape_search(
    page: &dyn PageDriver,
    query: &str,
    filter: SearchFilter,
    options: &ScrapeOptions,
) -> Result<SearchResult, ScrapeError> {
    tracing::info!(query, %filter, count = options.count, "Scraping search results");

    open_feed(page, &build_search_url(query, filter)).await?;

    let (mut tweets, _) =
        collect::scroll_and_collect(page, options.count, options.max_scrolls).await?;
    enrich_all(page, &mut tweets, options).await;

    let total_scraped = tweets.len();
    tracing::info!(query, total_scraped, "Search scrape complete");

    Ok(SearchResult {
        query: query.to_string(),
        filter: filter.to_string(),
        tweets,
        total_scraped,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::{feed_tweet, MockPage};
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_redirect_aborts_session() {
        let page = MockPage::new(vec![]);
        page.set_login_redirect();

        let err = scrape_bookmarks(&page, &ScrapeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::AuthExpired));
    }

    #[tokio::test]
    async fn test_duplicate_permalinks_do_not_inflate_total() {
        let page = MockPage::new(vec![
            json!([feed_tweet("https://x.example/1"), feed_tweet("https://x.example/1")]),
            json!([feed_tweet("https://x.example/1")]),
        ]);

        let result = scrape_bookmarks(&page, &ScrapeOptions::default())
            .await
            .unwrap();
        assert_eq!(result.total_scraped, 1);
        assert_eq!(result.tweets.len(), 1);
    }

    #[tokio::test]
    async fn test_quote_enrichment_blocks_thread_pass() {
        let mut raw = feed_tweet("https://x.com/u/status/1");
        raw["quoted_url"] = json!("https://x.com/q/status/9");
        let page = MockPage::new(vec![json!([raw])]);
        page.set_single(
            "https://x.com/q/status/9",
            json!({"text": "", "links": [{"href": "https://t.co/a", "text": "github.com"}]}),
        );

        let result = scrape_bookmarks(&page, &ScrapeOptions::default())
            .await
            .unwrap();
        assert_eq!(result.tweets[0].quoted_links.len(), 1);
        assert!(result.tweets[0].thread_text.is_empty());

        // Feed page + quoted tweet page; the permalink is never revisited
        // for a thread scan.
        let navs = page.navigations();
        assert_eq!(
            navs,
            vec![
                crate::config::BOOKMARKS_URL.to_string(),
                "https://x.com/q/status/9".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_linkless_tweet_gets_thread_pass() {
        let page = MockPage::new(vec![json!([feed_tweet("https://x.com/u/status/1")])]);
        page.set_thread(
            "https://x.com/u/status/1",
            json!({"links": [{"href": "https://t.co/x", "text": "arxiv.org"}], "texts": ["follow-up"]}),
        );

        let result = scrape_bookmarks(&page, &ScrapeOptions::default())
            .await
            .unwrap();
        assert_eq!(result.tweets[0].thread_links.len(), 1);
        assert_eq!(result.tweets[0].thread_text, "follow-up");
    }

    #[tokio::test]
    async fn test_passes_can_be_disabled() {
        let mut raw = feed_tweet("https://x.com/u/status/1");
        raw["quoted_url"] = json!("https://x.com/q/status/9");
        let page = MockPage::new(vec![json!([raw])]);

        let options = ScrapeOptions {
            follow_quotes: false,
            follow_threads: false,
            ..ScrapeOptions::default()
        };
        let result = scrape_bookmarks(&page, &options).await.unwrap();
        assert!(result.tweets[0].quoted_links.is_empty());
        assert_eq!(page.navigations(), vec![crate::config::BOOKMARKS_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_search_result_carries_query_and_filter() {
        let page = MockPage::new(vec![json!([feed_tweet("https://x.example/1")])]);

        let result = scrape_search(
            &page,
            "rust lang",
            SearchFilter::Latest,
            &ScrapeOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.query, "rust lang");
        assert_eq!(result.filter, "latest");
        assert_eq!(result.total_scraped, 1);
        assert_eq!(
            page.navigations()[0],
            "https://x.com/search?q=rust%20lang&f=live&src=typed_query"
        );
    }

    #[test]
    fn test_build_search_url_top_omits_live_filter() {
        assert_eq!(
            build_search_url("llm agents", SearchFilter::Top),
            "https://x.com/search?q=llm%20agents&src=typed_query"
        );
    }

    #[test]
    fn test_search_filter_parse() {
        assert_eq!(SearchFilter::parse("top"), Some(SearchFilter::Top));
        assert_eq!(SearchFilter::parse("latest"), Some(SearchFilter::Latest));
        assert_eq!(SearchFilter::parse("LIVE"), Some(SearchFilter::Latest));
        assert_eq!(SearchFilter::parse("hot"), None);
    }
}
