//! Loosely-typed shapes returned by the in-page extraction scripts, and
//! the assembly of canonical [`Tweet`]s from them.
//!
//! The page queries return untyped JSON from an external rendering surface;
//! every field defaults rather than being required, and malformed entries
//! are skipped instead of failing the batch.

use serde::Deserialize;
use serde_json::Value;

use crate::links::resolve_link;
use crate::models::{Link, Tweet};

/// An `{href, text}` pair as captured in the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    /// Anchor href. Empty when the entry was malformed.
    #[serde(default)]
    pub href: String,
    /// Anchor display text.
    #[serde(default)]
    pub text: String,
}

/// One tweet as captured by the feed extraction script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTweet {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub links: Vec<Value>,
    #[serde(default)]
    pub quoted_text: String,
    #[serde(default)]
    pub quoted_user: String,
    #[serde(default)]
    pub quoted_url: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_handle: String,
    #[serde(default)]
    pub tweet_url: String,
    #[serde(default)]
    pub truncated: bool,
}

/// Result of the single-tweet extraction script on a permalink page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SingleTweet {
    #[serde(default)]
    pub links: Vec<Value>,
    #[serde(default)]
    pub text: String,
}

/// Result of the thread extraction script: links and texts restricted to
/// posts by one author on the current page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadCapture {
    #[serde(default)]
    pub links: Vec<Value>,
    #[serde(default)]
    pub texts: Vec<String>,
}

/// Decode and resolve a list of raw link values.
///
/// Entries that fail to decode or carry an empty href are dropped.
pub fn resolve_raw_links(raw: &[Value]) -> Vec<Link> {
    raw.iter()
        .filter_map(|v| serde_json::from_value::<RawLink>(v.clone()).ok())
        .filter(|l| !l.href.is_empty())
        .map(|l| {
            let (resolved_url, domain, category) = resolve_link(&l.href, &l.text);
            Link {
                href: l.href,
                text: l.text,
                resolved_url: Some(resolved_url),
                domain: if domain.is_empty() { None } else { Some(domain) },
                category,
            }
        })
        .collect()
}

impl Tweet {
    /// Assemble a canonical tweet from one raw feed extraction, resolving
    /// every embedded link. Never fails; missing fields become defaults.
    #[must_use]
    pub fn from_raw(raw: RawTweet) -> Self {
        Self {
            links: resolve_raw_links(&raw.links),
            text: raw.text,
            user_name: raw.user_name,
            user_handle: raw.user_handle,
            tweet_url: raw.tweet_url,
            timestamp: raw.timestamp,
            quoted_text: raw.quoted_text,
            quoted_user: raw.quoted_user,
            quoted_url: raw.quoted_url,
            truncated: raw.truncated,
            ..Self::default()
        }
    }
}
