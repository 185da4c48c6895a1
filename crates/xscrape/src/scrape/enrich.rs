//! Enrichment passes: truncation recovery, quoted-tweet links, author
//! threads.
//!
//! The passes run in a fixed order because the thread pass's "no links
//! anywhere" precondition must observe what the earlier passes recovered.
//! Each pass is resilient per record: a failed navigation or extraction
//! leaves that tweet in its pre-pass state and moves on - a partially
//! enriched batch is still a valid result.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::{INITIAL_LOAD_PAUSE, SELECTOR_TIMEOUT};
use crate::error::ScrapeError;
use crate::extract::{resolve_raw_links, SingleTweet, ThreadCapture};
use crate::models::Tweet;
use crate::page::{js, PageDriver};

/// Navigate to a tweet permalink and wait for it to render.
async fn open_tweet_page(page: &dyn PageDriver, url: &str) -> Result<(), ScrapeError> {
    page.navigate(url).await?;
    page.wait_for_content(SELECTOR_TIMEOUT).await?;
    page.sleep(INITIAL_LOAD_PAUSE).await;
    Ok(())
}

/// Visit each truncated tweet's permalink to recover its full text and any
/// links hidden behind "Show more".
pub async fn recover_truncated(page: &dyn PageDriver, tweets: &mut [Tweet]) {
    for tweet in tweets {
        if !tweet.truncated || tweet.tweet_url.is_empty() {
            continue;
        }
        match recover_one(page, tweet).await {
            Ok(added) => {
                tracing::debug!(url = %tweet.tweet_url, links_added = added, "Recovered full tweet");
            }
            Err(e) => {
                // Tweet stays truncated; reflected in the output data
                tracing::warn!(url = %tweet.tweet_url, error = %e, "Full-text recovery failed");
            }
        }
    }
}

async fn recover_one(page: &dyn PageDriver, tweet: &mut Tweet) -> Result<usize, ScrapeError> {
    open_tweet_page(page, &tweet.tweet_url).await?;
    let value = page.evaluate(js::EXTRACT_SINGLE_TWEET_LINKS).await?;
    let data: SingleTweet = serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("Failed to decode single-tweet extraction: {e}"))?;

    if !data.text.is_empty() {
        tweet.text = data.text;
    }

    // Merge links the feed view didn't show, keyed by href
    let existing: HashSet<String> = tweet.links.iter().map(|l| l.href.clone()).collect();
    let mut added = 0;
    for link in resolve_raw_links(&data.links) {
        if existing.contains(&link.href) {
            continue;
        }
        tweet.links.push(link);
        added += 1;
    }
    tweet.truncated = false;
    Ok(added)
}

/// Visit each quoted tweet's page and collect its outbound links into
/// `quoted_links`.
///
/// Quoted-tweet links are a distinct namespace; they are not deduplicated
/// against the parent tweet's own links.
pub async fn follow_quotes(page: &dyn PageDriver, tweets: &mut [Tweet]) {
    for tweet in tweets {
        if tweet.quoted_url.is_empty() || !tweet.quoted_url.contains("x.com") {
            continue;
        }
        match quote_links(page, &tweet.quoted_url).await {
            Ok(links) => {
                tracing::debug!(url = %tweet.quoted_url, links = links.len(), "Followed quoted tweet");
                tweet.quoted_links.extend(links);
            }
            Err(e) => {
                tracing::warn!(url = %tweet.quoted_url, error = %e, "Quoted tweet visit failed");
            }
        }
    }
}

async fn quote_links(
    page: &dyn PageDriver,
    quoted_url: &str,
) -> Result<Vec<crate::models::Link>, ScrapeError> {
    open_tweet_page(page, quoted_url).await?;
    let value = page.evaluate(js::EXTRACT_SINGLE_TWEET_LINKS).await?;
    let data: SingleTweet = serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("Failed to decode single-tweet extraction: {e}"))?;
    Ok(resolve_raw_links(&data.links))
}

/// Number of extra scrolls performed on a permalink page to load replies.
const THREAD_SCROLLS: usize = 4;
/// Max same-author posts joined into `thread_text`.
const THREAD_TEXT_LIMIT: usize = 10;

/// For tweets that still have no links anywhere, revisit the permalink and
/// scan the author's own replies - link-carrying threads often put the
/// payload a few posts down.
pub async fn follow_threads(page: &dyn PageDriver, tweets: &mut [Tweet]) {
    for tweet in tweets {
        if tweet.has_any_links() {
            continue;
        }
        if tweet.tweet_url.is_empty() || tweet.user_handle.is_empty() {
            continue;
        }
        match thread_capture(page, &tweet.tweet_url, &tweet.user_handle).await {
            Ok(data) => {
                tweet.thread_links.extend(resolve_raw_links(&data.links));
                tweet.thread_text = data
                    .texts
                    .iter()
                    .take(THREAD_TEXT_LIMIT)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n");
                tracing::debug!(
                    url = %tweet.tweet_url,
                    links = tweet.thread_links.len(),
                    posts = data.texts.len(),
                    "Scanned author thread"
                );
            }
            Err(e) => {
                tracing::warn!(url = %tweet.tweet_url, error = %e, "Thread scan failed");
            }
        }
    }
}

async fn thread_capture(
    page: &dyn PageDriver,
    tweet_url: &str,
    handle: &str,
) -> Result<ThreadCapture, ScrapeError> {
    open_tweet_page(page, tweet_url).await?;

    // Replies render lazily; nudge the page a few times
    for _ in 0..THREAD_SCROLLS {
        page.scroll_by_viewports(1.0).await?;
        page.sleep(Duration::from_secs(1)).await;
    }

    let value = page.evaluate(&js::extract_thread_expr(handle)).await?;
    serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("Failed to decode thread extraction: {e}").into())
}
