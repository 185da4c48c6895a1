//! Result rendering: compact JSON summaries and a colored terminal table.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::models::{BookmarksResult, Link, SearchResult, Tweet};

/// Compact link view: the best URL we resolved plus its classification.
#[derive(Debug, Serialize)]
struct LinkSummary {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl LinkSummary {
    fn from_link(link: &Link) -> Self {
        Self {
            url: link.best_url().to_string(),
            domain: link.domain.clone(),
            category: link.category.map(|c| c.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct TweetSummary {
    user: String,
    text: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    links: Vec<LinkSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quoted_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quoted_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    quoted_links: Vec<LinkSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    thread_links: Vec<LinkSummary>,
}

impl TweetSummary {
    fn from_tweet(tweet: &Tweet) -> Self {
        let has_quote = !tweet.quoted_url.is_empty();
        Self {
            user: tweet.user_handle.clone(),
            text: truncate_chars(&tweet.text, 200),
            url: tweet.tweet_url.clone(),
            timestamp: tweet.timestamp.clone(),
            links: tweet.links.iter().map(LinkSummary::from_link).collect(),
            quoted_url: has_quote.then(|| tweet.quoted_url.clone()),
            quoted_text: has_quote.then(|| truncate_chars(&tweet.quoted_text, 200)),
            quoted_links: tweet.quoted_links.iter().map(LinkSummary::from_link).collect(),
            thread_links: tweet.thread_links.iter().map(LinkSummary::from_link).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    tweets: Vec<TweetSummary>,
}

/// Render a bookmarks result as pretty JSON.
pub fn bookmarks_json(result: &BookmarksResult) -> Result<String> {
    let report = Report {
        total: result.total_scraped,
        query: None,
        filter: None,
        tweets: result.tweets.iter().map(TweetSummary::from_tweet).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render a search result as pretty JSON.
pub fn search_json(result: &SearchResult) -> Result<String> {
    let report = Report {
        total: result.total_scraped,
        query: Some(result.query.clone()),
        filter: Some(result.filter.clone()),
        tweets: result.tweets.iter().map(TweetSummary::from_tweet).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Print a bookmarks result as a colored table.
pub fn print_bookmarks_table(result: &BookmarksResult) {
    print_table(&result.tweets, result.total_scraped);
}

/// Print a search result as a colored table.
pub fn print_search_table(result: &SearchResult) {
    println!(
        "\n{} ({})",
        format!("Search: {}", result.query).bold(),
        result.filter
    );
    print_table(&result.tweets, result.total_scraped);
}

fn print_table(tweets: &[Tweet], total: usize) {
    for (i, tweet) in tweets.iter().enumerate() {
        println!(
            "\n{} {} {}",
            format!("#{}", i + 1).dimmed(),
            tweet.user_handle.cyan(),
            tweet.timestamp.as_deref().unwrap_or("").dimmed()
        );
        println!("   {}", truncate_chars(&tweet.text, 120));

        let all_links = tweet
            .links
            .iter()
            .chain(tweet.quoted_links.iter())
            .chain(tweet.thread_links.iter());
        let mut any = false;
        for link in all_links {
            any = true;
            match link.category {
                Some(category) => {
                    println!("   {} {}", format!("[{category}]").green(), link.best_url());
                }
                None => println!("   {}", link.best_url()),
            }
        }
        if !any {
            println!("   {}", "no links".dimmed());
        }
    }

    println!("\n{} tweets scraped", total.to_string().bold());
}

/// Truncate to a character count, appending an ellipsis when shortened.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkCategory;

    fn sample_result() -> BookmarksResult {
        BookmarksResult {
            tweets: vec![Tweet {
                text: "a tweet".to_string(),
                user_handle: "@author".to_string(),
                tweet_url: "https://x.com/author/status/1".to_string(),
                links: vec![Link {
                    href: "https://t.co/a".to_string(),
                    text: "arxiv.org".to_string(),
                    resolved_url: Some("https://arxiv.org".to_string()),
                    domain: Some("arxiv.org".to_string()),
                    category: Some(LinkCategory::Arxiv),
                }],
                ..Tweet::default()
            }],
            total_scraped: 1,
            scrolls_performed: 2,
        }
    }

    #[test]
    fn test_bookmarks_json_shape() {
        let json = bookmarks_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["tweets"][0]["user"], "@author");
        assert_eq!(value["tweets"][0]["links"][0]["url"], "https://arxiv.org");
        assert_eq!(value["tweets"][0]["links"][0]["category"], "arxiv");
        // No quote, so quoted fields are omitted entirely
        assert!(value["tweets"][0].get("quoted_url").is_none());
        assert!(value.get("query").is_none());
    }

    #[test]
    fn test_search_json_carries_query() {
        let result = SearchResult {
            query: "rust".to_string(),
            filter: "latest".to_string(),
            tweets: vec![],
            total_scraped: 0,
        };
        let value: serde_json::Value =
            serde_json::from_str(&search_json(&result).unwrap()).unwrap();
        assert_eq!(value["query"], "rust");
        assert_eq!(value["filter"], "latest");
    }

    #[test]
    fn test_truncate_chars_utf8_safe() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }
}
