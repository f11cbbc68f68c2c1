//! Topic-Crawler: a topic-guided, bounded web crawler
//!
//! Starting from a seed URL, this crate explores a site's link graph, asks a
//! pluggable relevance oracle which outgoing links are worth following for a
//! topic, and stops once the page budget is spent or the frontier runs dry.
//! The visited pages are then handed to an indexing sink in one batch.

pub mod config;
pub mod crawler;
pub mod oracle;
pub mod output;
pub mod page;
pub mod sink;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Topic-Crawler operations
///
/// Only configuration problems (before the loop starts) and sink failures
/// (at completion) ever surface here. Per-page failures are absorbed by the
/// coordinator and reported through [`output::CrawlReport`].
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Indexing sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Topic-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

// Re-export commonly used types
pub use config::{CrawlConfig, Settings};
pub use crawler::Coordinator;
pub use output::CrawlReport;
pub use page::Page;
pub use crate::url::{normalize_url, same_origin};
