//! Typed errors for the scrape engine.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by scrape sessions.
///
/// Only `AuthExpired` and `ContentTimeout` on the starting page abort a
/// session; failures during per-record enrichment are caught at the pass
/// level and reflected in data completeness instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Navigation landed on the login page - session cookies are invalid.
    #[error("authentication expired: redirected to login page (run: xscrape auth save)")]
    AuthExpired,

    /// No tweet rendered within the content timeout.
    #[error("timed out after {waited:?} waiting for tweets to render")]
    ContentTimeout {
        /// How long we waited.
        waited: Duration,
    },

    /// Navigation did not complete within the navigation timeout.
    #[error("navigation to {url} timed out")]
    NavigationTimeout {
        /// Target URL.
        url: String,
    },

    /// Underlying browser/CDP failure.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// Anything else (JSON decoding of page results, IO, ...).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
