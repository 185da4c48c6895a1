//! Interactive browser login and session validation.

use anyhow::Result;

use crate::page::{BrowserHandle, PageDriver};

use super::Session;

/// Browser-based authentication for Twitter/X.
pub struct BrowserAuth {
    headless: bool,
}

impl BrowserAuth {
    /// Create a new browser auth instance.
    #[must_use]
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }

    /// Perform interactive login and extract session cookies.
    ///
    /// Opens a browser window, lets the user log in manually, then reads
    /// the cookies over CDP (`document.cookie` can't see HttpOnly cookies
    /// like `auth_token`).
    pub async fn login(&self) -> Result<Session> {
        tracing::info!(headless = self.headless, "Launching browser for login");

        let (handle, page) = BrowserHandle::launch(self.headless).await?;
        page.navigate("https://x.com/login").await?;

        if !self.headless {
            println!("\nPlease log in to Twitter/X in the browser window.");
            println!("Press Enter when you're done...\n");

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
        }

        // Let cookies settle after login
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        let cookies = page.get_cookies().await?;
        handle.close().await?;

        let mut auth_token = None;
        let mut ct0 = None;
        for cookie in cookies {
            match cookie.name.as_str() {
                "auth_token" => auth_token = Some(cookie.value.clone()),
                "ct0" => ct0 = Some(cookie.value.clone()),
                _ => {}
            }
        }

        let auth_token = auth_token.ok_or_else(|| {
            anyhow::anyhow!("Failed to extract auth_token cookie - login may have failed")
        })?;

        tracing::info!("Successfully extracted session cookies");
        Ok(Session::new(auth_token, ct0))
    }

    /// Validate a session by probing an authenticated API endpoint.
    pub async fn validate_session(&self, session: &Session) -> Result<bool> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()?;

        let response = client
            .get("https://x.com/i/api/1.1/account/settings.json")
            .header("Cookie", session.cookie_string())
            .header("x-csrf-token", session.ct0.as_deref().unwrap_or(""))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
