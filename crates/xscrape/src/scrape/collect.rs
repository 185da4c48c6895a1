//! Incremental scroll-and-collect loop.
//!
//! X keeps previously rendered tweets mounted while new ones stream in, so
//! each snapshot overlaps the last. The loop deduplicates by permalink and
//! stops on target count, scroll budget, or a streak of snapshots that
//! yield nothing new (feed exhausted or rate limiting kicked in).
//!
//! Scroll pagination has no stable cursor; permalink dedup is a practical
//! approximation of completeness, not a guarantee. Tweets whose permalink
//! could not be captured are dropped - without a key they cannot be
//! deduplicated across snapshots.

use std::collections::HashSet;

use serde_json::Value;

use crate::config::{EMPTY_SCROLL_THRESHOLD, SCROLL_PAUSE};
use crate::error::ScrapeError;
use crate::extract::RawTweet;
use crate::models::Tweet;
use crate::page::{js, PageDriver};

/// Scroll the feed, collecting tweets until `max_count` is reached or the
/// feed stops producing. Returns the tweets in first-seen order and the
/// number of scroll iterations executed.
pub async fn scroll_and_collect(
    page: &dyn PageDriver,
    max_count: usize,
    max_scrolls: usize,
) -> Result<(Vec<Tweet>, usize), ScrapeError> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut tweets: Vec<Tweet> = Vec::new();
    let mut empty_streak: u32 = 0;
    let mut iterations = 0;

    for scroll_num in 0..max_scrolls {
        iterations = scroll_num + 1;

        let snapshot = page.evaluate(js::EXTRACT_TWEETS).await?;
        // Non-array results count as an empty snapshot, not a failure
        let batch: Vec<Value> = serde_json::from_value(snapshot).unwrap_or_default();

        let mut new_count = 0;
        for value in batch {
            let Ok(raw) = serde_json::from_value::<RawTweet>(value) else {
                continue;
            };
            if raw.tweet_url.is_empty() || seen_urls.contains(&raw.tweet_url) {
                continue;
            }
            seen_urls.insert(raw.tweet_url.clone());
            tweets.push(Tweet::from_raw(raw));
            new_count += 1;
        }

        tracing::debug!(
            iteration = iterations,
            new = new_count,
            total = tweets.len(),
            "Collected feed snapshot"
        );

        if tweets.len() >= max_count {
            break;
        }

        if new_count == 0 {
            empty_streak += 1;
            if empty_streak >= EMPTY_SCROLL_THRESHOLD {
                tracing::info!(
                    iterations,
                    collected = tweets.len(),
                    "Feed stopped producing new tweets, ending collection"
                );
                break;
            }
        } else {
            empty_streak = 0;
        }

        page.scroll_by_viewports(2.0).await?;
        page.sleep(SCROLL_PAUSE).await;
    }

    tweets.truncate(max_count);
    Ok((tweets, iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::testing::{feed_tweet, MockPage};
    use serde_json::json;

    #[tokio::test]
    async fn test_dedup_by_permalink_across_snapshots() {
        let page = MockPage::new(vec![
            json!([feed_tweet("https://x.example/1"), feed_tweet("https://x.example/1")]),
            json!([feed_tweet("https://x.example/1"), feed_tweet("https://x.example/2")]),
        ]);

        let (tweets, _) = scroll_and_collect(&page, 50, 20).await.unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].tweet_url, "https://x.example/1");
        assert_eq!(tweets[1].tweet_url, "https://x.example/2");
    }

    #[tokio::test]
    async fn test_empty_permalink_dropped() {
        let page = MockPage::new(vec![json!([
            feed_tweet(""),
            feed_tweet("https://x.example/1"),
        ])]);

        let (tweets, _) = scroll_and_collect(&page, 50, 20).await.unwrap();
        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0].tweet_url, "https://x.example/1");
    }

    #[tokio::test]
    async fn test_stops_at_target_count_without_trailing_scroll() {
        let page = MockPage::new(vec![json!([
            feed_tweet("https://x.example/1"),
            feed_tweet("https://x.example/2"),
            feed_tweet("https://x.example/3"),
        ])]);

        let (tweets, iterations) = scroll_and_collect(&page, 2, 20).await.unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(iterations, 1);
        assert_eq!(page.scroll_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_streak_termination() {
        // Feed produces new tweets on iterations 1 and 2, then repeats:
        // three empty iterations end collection at iteration 5.
        let page = MockPage::new(vec![
            json!([feed_tweet("https://x.example/1")]),
            json!([feed_tweet("https://x.example/1"), feed_tweet("https://x.example/2")]),
        ]);

        let (tweets, iterations) = scroll_and_collect(&page, 50, 20).await.unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(iterations, 5);
    }

    #[tokio::test]
    async fn test_respects_scroll_budget() {
        let page = MockPage::new(
            (1..100)
                .map(|i| {
                    json!((1..=i)
                        .map(|n| feed_tweet(&format!("https://x.example/{n}")))
                        .collect::<Vec<_>>())
                })
                .collect(),
        );

        let (tweets, iterations) = scroll_and_collect(&page, 1000, 4).await.unwrap();
        assert_eq!(iterations, 4);
        assert!(tweets.len() <= 1000);
    }

    #[tokio::test]
    async fn test_zero_scroll_budget() {
        let page = MockPage::new(vec![json!([feed_tweet("https://x.example/1")])]);
        let (tweets, iterations) = scroll_and_collect(&page, 50, 0).await.unwrap();
        assert!(tweets.is_empty());
        assert_eq!(iterations, 0);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_entries_skipped() {
        let page = MockPage::new(vec![json!([
            "garbage",
            feed_tweet("https://x.example/1"),
        ])]);

        let (tweets, _) = scroll_and_collect(&page, 50, 20).await.unwrap();
        assert_eq!(tweets.len(), 1);
    }
}
