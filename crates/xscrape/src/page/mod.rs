//! Page driver: the engine's only window onto the browser.
//!
//! The scrape engine talks to a [`PageDriver`] trait object so the scroll
//! and enrichment logic can be exercised against a scripted page in tests.
//! [`ChromiumPage`] is the production implementation on top of
//! chromiumoxide. A driver is a single shared mutable rendering context:
//! all operations are issued sequentially, never concurrently.

pub mod js;

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Cookie, CookieParam};
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;

use crate::auth::Session;
use crate::config::NAV_TIMEOUT;
use crate::error::ScrapeError;

/// Sequential browser-page operations the scrape engine depends on.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL and wait for the navigation to complete.
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError>;

    /// The page's current URL (after any redirects).
    async fn current_url(&self) -> Result<String, ScrapeError>;

    /// Wait until at least one tweet has rendered, or time out.
    async fn wait_for_content(&self, timeout: Duration) -> Result<(), ScrapeError>;

    /// Evaluate a JavaScript expression in the page, returning its JSON
    /// value.
    async fn evaluate(&self, expression: &str) -> Result<Value, ScrapeError>;

    /// Scroll the viewport forward by the given number of viewport heights.
    async fn scroll_by_viewports(&self, factor: f64) -> Result<(), ScrapeError>;

    /// Suspend for the given duration (scroll settle, render pauses).
    async fn sleep(&self, duration: Duration);
}

/// Production page driver backed by a chromiumoxide page.
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// Inject session cookies, establishing the x.com domain context first.
    pub async fn authenticate(&self, session: &Session) -> Result<(), ScrapeError> {
        tracing::debug!("Navigating to x.com to set cookies");
        self.navigate("https://x.com").await?;
        tokio::time::sleep(Duration::from_secs(2)).await;

        tracing::debug!("Setting auth cookies");
        let auth_cookie = CookieParam::builder()
            .name("auth_token")
            .value(&session.auth_token)
            .domain(".x.com")
            .path("/")
            .secure(true)
            .http_only(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build auth cookie: {e}"))?;
        self.page.set_cookie(auth_cookie).await?;

        if let Some(ct0) = &session.ct0 {
            let ct0_cookie = CookieParam::builder()
                .name("ct0")
                .value(ct0)
                .domain(".x.com")
                .path("/")
                .secure(true)
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to build ct0 cookie: {e}"))?;
            self.page.set_cookie(ct0_cookie).await?;
        }

        Ok(())
    }

    /// All cookies visible to the page, including HttpOnly ones.
    pub async fn get_cookies(&self) -> Result<Vec<Cookie>, ScrapeError> {
        Ok(self.page.get_cookies().await?)
    }
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn navigate(&self, url: &str) -> Result<(), ScrapeError> {
        match tokio::time::timeout(NAV_TIMEOUT, self.page.goto(url)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
            }),
        }
    }

    async fn current_url(&self) -> Result<String, ScrapeError> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn wait_for_content(&self, timeout: Duration) -> Result<(), ScrapeError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let rendered = self
                .evaluate(js::TWEET_RENDERED)
                .await
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if rendered {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScrapeError::ContentTimeout { waited: timeout });
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, ScrapeError> {
        let result = self.page.evaluate(expression).await?;
        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("Failed to decode page result: {e}").into())
    }

    async fn scroll_by_viewports(&self, factor: f64) -> Result<(), ScrapeError> {
        self.page.evaluate(js::scroll_by_expr(factor)).await?;
        Ok(())
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Owns the launched browser and its spawned CDP event handler task.
pub struct BrowserHandle {
    browser: Browser,
    handler: tokio::task::JoinHandle<()>,
}

impl BrowserHandle {
    /// Launch a browser and open a blank page.
    pub async fn launch(headless: bool) -> Result<(Self, ChromiumPage), ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox") // Required for containerized environments
            .arg("--disable-dev-shm-usage"); // Avoid /dev/shm size issues in containers
        if !headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Drive CDP events until the browser goes away
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok((
            Self {
                browser,
                handler: handle,
            },
            ChromiumPage { page },
        ))
    }

    /// Close the browser and join the handler task.
    pub async fn close(mut self) -> Result<(), ScrapeError> {
        self.browser.close().await?;
        self.handler
            .await
            .map_err(|e| anyhow::anyhow!("Browser handler task failed: {e}"))?;
        Ok(())
    }
}
