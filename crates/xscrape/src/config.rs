//! Scrape configuration: URLs, timeouts, and scroll-loop defaults.

use std::time::Duration;

/// Bookmarks feed URL.
pub const BOOKMARKS_URL: &str = "https://x.com/i/bookmarks";
/// Search page URL (query parameters appended by the orchestrator).
pub const SEARCH_URL: &str = "https://x.com/search";

/// Timeout for a single page navigation.
pub const NAV_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout waiting for the first tweet to render after navigation.
pub const SELECTOR_TIMEOUT: Duration = Duration::from_secs(15);
/// Settle time after each scroll, so lazy content can render.
pub const SCROLL_PAUSE: Duration = Duration::from_secs(2);
/// Settle time after a navigation, before querying the page.
pub const INITIAL_LOAD_PAUSE: Duration = Duration::from_secs(1);

/// Consecutive scroll iterations yielding no new tweets before the
/// collect loop treats the feed as exhausted.
pub const EMPTY_SCROLL_THRESHOLD: u32 = 3;

/// Options controlling a single scrape session.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Max tweets to collect.
    pub count: usize,
    /// Max scroll iterations before giving up.
    pub max_scrolls: usize,
    /// Follow quoted tweets to collect their links.
    pub follow_quotes: bool,
    /// Follow author threads for tweets with no links.
    pub follow_threads: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            count: 50,
            max_scrolls: 20,
            follow_quotes: true,
            follow_threads: true,
        }
    }
}
