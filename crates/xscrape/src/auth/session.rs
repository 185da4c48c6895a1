//! Twitter/X session cookie persistence.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The cookies that authenticate a scrape session.
///
/// `auth_token` is the long-lived login cookie; `ct0` is the CSRF token and
/// regenerates on its own, so it is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Long-lived auth token cookie.
    pub auth_token: String,
    /// CSRF token cookie, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct0: Option<String>,
    /// When this session was captured.
    pub created_at: DateTime<Utc>,
    /// When this session last passed validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_validated: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session from captured cookies.
    #[must_use]
    pub fn new(auth_token: String, ct0: Option<String>) -> Self {
        Self {
            auth_token,
            ct0,
            created_at: Utc::now(),
            last_validated: None,
        }
    }

    /// Load a session from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the session as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load from the session file if present, else fall back to the
    /// `TWITTER_AUTH_TOKEN` / `TWITTER_CT0` environment variables.
    pub fn load_or_env(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading session from file");
            return Self::load(path);
        }
        let auth_token = std::env::var("TWITTER_AUTH_TOKEN").map_err(|_| {
            anyhow::anyhow!(
                "No session file at {} and TWITTER_AUTH_TOKEN not set (run: xscrape auth save)",
                path.display()
            )
        })?;
        Ok(Self::new(auth_token, std::env::var("TWITTER_CT0").ok()))
    }

    /// Record a successful validation.
    pub fn mark_validated(&mut self) {
        self.last_validated = Some(Utc::now());
    }

    /// Cookie header value for HTTP requests.
    #[must_use]
    pub fn cookie_string(&self) -> String {
        match &self.ct0 {
            Some(ct0) => format!("auth_token={}; ct0={}", self.auth_token, ct0),
            None => format!("auth_token={}", self.auth_token),
        }
    }
}
