//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - Page fetching over HTTP (and headless Chromium with the `browser` feature)
//! - HTML parsing and link extraction
//! - The frontier queue and visited set
//! - Overall crawl coordination

#[cfg(feature = "browser")]
mod browser;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

#[cfg(feature = "browser")]
pub use browser::BrowserFetcher;
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, VisitedSet};
pub use parser::{extract_links, parse_html, ExtractionError, Link, ParsedPage, NO_DESCRIPTION};

use crate::config::CrawlConfig;
use crate::oracle::RelevanceOracle;
use crate::output::CrawlReport;
use crate::sink::IndexingSink;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the config and seed the frontier
/// 2. Fetch pages breadth-first until the frontier, budget, or time limit runs out
/// 3. Ask the oracle which links of each page to follow
/// 4. Hand the fetched pages to the sink under `namespace`
///
/// # Arguments
///
/// * `config` - The crawl input
/// * `namespace` - Index namespace for the result set
/// * `fetcher` - Retrieves pages
/// * `oracle` - Chooses links to follow
/// * `sink` - Receives the result set
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed and was indexed
/// * `Err(CrawlerError)` - Invalid config, or the sink failed
pub async fn crawl(
    config: CrawlConfig,
    namespace: &str,
    fetcher: Box<dyn PageFetcher>,
    oracle: Box<dyn RelevanceOracle>,
    sink: Box<dyn IndexingSink>,
) -> crate::Result<CrawlReport> {
    Coordinator::new(config, namespace, fetcher, oracle, sink)?
        .run()
        .await
}
