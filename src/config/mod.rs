//! Configuration module for Topic-Crawler
//!
//! This module holds the immutable per-crawl input ([`CrawlConfig`]) and the
//! optional TOML settings file that configures the fetcher, oracle, and index.
//!
//! # Example
//!
//! ```no_run
//! use topic_crawler::config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("crawl.toml")).unwrap();
//! let crawl = settings.crawl_config().unwrap();
//! println!("Crawling {} for at most {} pages", crawl.seed_url, crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    CrawlConfig, CrawlSection, FetchMode, FetcherConfig, IndexConfig, OracleConfig, OracleKind,
    Settings, DEFAULT_MAX_PAGES, DEFAULT_NAMESPACE, DEFAULT_PREVIEW_CHARS,
};

pub use parser::{load_settings, parse_settings};
pub use validation::{validate_crawl_config, validate_settings};
