//! Headless Chromium page fetcher
//!
//! Used for sites that build their content client-side. One browser process
//! lives for the whole crawl; each fetch opens its own tab and closes it on
//! every exit path, success or failure.

use crate::config::FetcherConfig;
use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::page::Page;
use crate::CrawlerError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page as Tab;
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Fetches pages by rendering them in headless Chromium
pub struct BrowserFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
    render_wait: Duration,
}

impl BrowserFetcher {
    /// Launches a headless browser configured from `config`
    pub async fn launch(config: &FetcherConfig) -> Result<Self, CrawlerError> {
        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);

        let browser_config = BrowserConfig::builder()
            .request_timeout(navigation_timeout)
            .window_size(1920, 1080)
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--mute-audio")
            .build()
            .map_err(CrawlerError::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CrawlerError::Browser(format!("failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {:?}", e);
                }
            }
        });

        tracing::info!("Headless browser launched");

        Ok(Self {
            browser,
            handler,
            navigation_timeout,
            render_wait: Duration::from_millis(config.render_wait_ms),
        })
    }

    /// Navigates `tab` to `url` and captures the rendered DOM
    async fn render(&self, tab: &Tab, url: &str) -> Result<Page, FetchError> {
        bounded(Stage::Navigation, self.navigation_timeout, url, tab.goto(url))
            .await?
            .map_err(|e| browser_error(url, e))?;

        let render_budget = self.navigation_timeout + self.render_wait;
        bounded(Stage::Render, render_budget, url, async {
            tab.wait_for_navigation().await?;
            tokio::time::sleep(self.render_wait).await;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await?
        .map_err(|e| browser_error(url, e))?;

        let content = tab.content().await.map_err(|e| browser_error(url, e))?;
        let final_url = tab
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());
        let title = tab
            .get_title()
            .await
            .ok()
            .flatten()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Page::new(url, content)
            .with_final_url(final_url)
            .with_title(title))
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let tab = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| browser_error(url, e))?;

        let result = self.render(&tab, url).await;

        if let Err(e) = tab.close().await {
            tracing::debug!(url = %url, "Failed to close browser tab: {}", e);
        }

        result
    }
}

impl Drop for BrowserFetcher {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Which part of a browser fetch a deadline guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Navigation,
    Render,
}

impl Stage {
    fn timeout_error(self, url: &str) -> FetchError {
        let url = url.to_string();
        match self {
            Stage::Navigation => FetchError::NavigationTimeout { url },
            Stage::Render => FetchError::RenderTimeout { url },
        }
    }
}

/// Runs `operation` within `limit`, mapping expiry to the stage's timeout error
async fn bounded<F, T>(
    stage: Stage,
    limit: Duration,
    url: &str,
    operation: F,
) -> Result<T, FetchError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| stage.timeout_error(url))
}

fn browser_error(url: &str, error: chromiumoxide::error::CdpError) -> FetchError {
    FetchError::Browser {
        url: url.to_string(),
        message: error.to_string(),
    }
}
