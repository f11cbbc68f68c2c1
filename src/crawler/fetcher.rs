//! Page fetcher implementation
//!
//! This module defines the [`PageFetcher`] seam the coordinator fetches
//! through, the per-URL [`FetchError`] taxonomy, and the default
//! reqwest-backed [`HttpFetcher`].
//!
//! Every failure is returned as a value. A fetcher never panics and never
//! aborts the crawl; the coordinator records the URL as visited-but-failed
//! and moves on. Nothing is cached or retried between calls.

use crate::config::FetcherConfig;
use crate::page::Page;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Recoverable, per-URL fetch failure
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Navigation timeout for {url}")]
    NavigationTimeout { url: String },

    #[error("Render timeout for {url}")]
    RenderTimeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Expected HTML from {url}, got '{content_type}'")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Browser error for {url}: {message}")]
    Browser { url: String, message: String },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::NavigationTimeout { url }
            | Self::RenderTimeout { url }
            | Self::HttpStatus { url, .. }
            | Self::ContentMismatch { url, .. }
            | Self::Body { url, .. }
            | Self::Browser { url, .. } => url,
        }
    }

    /// Stable snake_case name of the error kind, for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::NavigationTimeout { .. } => "navigation_timeout",
            Self::RenderTimeout { .. } => "render_timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::ContentMismatch { .. } => "content_mismatch",
            Self::Body { .. } => "body",
            Self::Browser { .. } => "browser",
        }
    }

    /// Returns true for navigation and render timeouts
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::NavigationTimeout { .. } | Self::RenderTimeout { .. }
        )
    }
}

/// Retrieves a URL's content as a [`Page`]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`
    ///
    /// The returned page's `url` must equal the requested `url`, even when
    /// redirects land elsewhere (that goes in `final_url`).
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches raw HTML over HTTP
///
/// Redirects are followed by the client. Only `text/html` and
/// `application/xhtml+xml` responses are accepted; a missing Content-Type
/// header is given the benefit of the doubt.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        Ok(Page::new(url, body).with_final_url(final_url))
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_reqwest_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::NavigationTimeout {
            url: url.to_string(),
        }
    } else if error.is_body() || error.is_decode() {
        FetchError::Body {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else if let Some(status) = error.status().filter(|s| *s != StatusCode::OK) {
        FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
