//! Read-only Twitter/X scraper.
//!
//! This crate provides:
//! - Bookmark and search scraping over browser automation (chromiumoxide)
//! - An incremental scroll-and-collect loop with permalink deduplication
//! - t.co link recovery from anchor text and domain classification
//! - Enrichment passes for truncated tweets, quoted tweets, and author
//!   threads
//! - Cookie-based session persistence with interactive login

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod links;
pub mod models;
pub mod output;
pub mod page;
pub mod scrape;

// Re-export main types
pub use auth::{BrowserAuth, Session};
pub use config::ScrapeOptions;
pub use error::ScrapeError;
pub use links::LinkCategory;
pub use models::{BookmarksResult, Link, SearchResult, Tweet};
pub use page::{BrowserHandle, ChromiumPage, PageDriver};
pub use scrape::{scrape_bookmarks, scrape_search, SearchFilter};
