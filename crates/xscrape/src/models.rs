//! Canonical scrape data model.

use serde::{Deserialize, Serialize};

use crate::links::LinkCategory;

/// An outbound link found on a tweet, with its resolved destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The href as rendered (usually a t.co shortener URL).
    pub href: String,
    /// The anchor display text.
    #[serde(default)]
    pub text: String,
    /// Fully-qualified destination URL, when recoverable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    /// Hostname of the resolved URL, when parseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Domain category, when the domain is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<LinkCategory>,
}

impl Link {
    /// The best URL we have for this link: resolved if available, raw href
    /// otherwise.
    #[must_use]
    pub fn best_url(&self) -> &str {
        self.resolved_url.as_deref().unwrap_or(&self.href)
    }
}

/// One collected tweet.
///
/// Created by the collect loop and mutated in place by the enrichment
/// passes: the truncation pass replaces `text` and clears `truncated`, the
/// quote pass fills `quoted_links`, the thread pass fills `thread_text` and
/// `thread_links`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet text (feed-view text until truncation recovery runs).
    #[serde(default)]
    pub text: String,
    /// Author display name.
    #[serde(default)]
    pub user_name: String,
    /// Author handle, including the leading `@`.
    #[serde(default)]
    pub user_handle: String,
    /// Permalink URL; the deduplication key. Empty means the tweet could
    /// not be keyed and was dropped at collection time.
    #[serde(default)]
    pub tweet_url: String,
    /// ISO-8601 post timestamp, when the page exposed one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Outbound links, in order of first appearance.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Text of an embedded quoted tweet, if any.
    #[serde(default)]
    pub quoted_text: String,
    /// Author of the quoted tweet.
    #[serde(default)]
    pub quoted_user: String,
    /// Permalink of the quoted tweet.
    #[serde(default)]
    pub quoted_url: String,
    /// Links found on the quoted tweet's own page (quote pass).
    #[serde(default)]
    pub quoted_links: Vec<Link>,
    /// Links found in same-author thread replies (thread pass).
    #[serde(default)]
    pub thread_links: Vec<Link>,
    /// Concatenated same-author thread text (thread pass).
    #[serde(default)]
    pub thread_text: String,
    /// True while the feed view hid part of the tweet behind "Show more".
    #[serde(default)]
    pub truncated: bool,
}

impl Tweet {
    /// Whether any links were found anywhere on this tweet.
    ///
    /// A non-empty `quoted_url` counts: the quoted tweet itself is a lead
    /// even if its page yielded nothing.
    #[must_use]
    pub fn has_any_links(&self) -> bool {
        !self.links.is_empty() || !self.quoted_links.is_empty() || !self.quoted_url.is_empty()
    }
}

/// Result of a bookmarks scrape. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarksResult {
    /// Collected tweets, in first-seen order.
    pub tweets: Vec<Tweet>,
    /// Number of tweets collected.
    pub total_scraped: usize,
    /// Scroll iterations executed by the collect loop.
    pub scrolls_performed: usize,
}

/// Result of a search scrape. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The search query, as submitted.
    pub query: String,
    /// Feed ordering used (`top` or `latest`).
    pub filter: String,
    /// Collected tweets, in first-seen order.
    pub tweets: Vec<Tweet>,
    /// Number of tweets collected.
    pub total_scraped: usize,
}
