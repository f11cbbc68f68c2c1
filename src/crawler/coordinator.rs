//! Crawler coordinator - main crawl orchestration logic
//!
//! This module owns the frontier, the visited set, the page budget, and the
//! result set, and drives the loop:
//!
//! fetch → extract → scope → select → enqueue
//!
//! until the frontier is empty, the budget is spent, or the time limit
//! passes. The finished result set is then handed to the indexing sink once.
//!
//! No per-page failure ever escapes the loop. Fetch failures mark the URL
//! visited-but-failed, extraction failures yield no links, and oracle
//! failures yield an empty selection.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{Frontier, VisitedSet};
use crate::crawler::parser::parse_html;
use crate::oracle::{preview, Candidate, RelevanceOracle, RelevanceRequest};
use crate::output::{CrawlReport, FailedVisit};
use crate::page::Page;
use crate::sink::IndexingSink;
use crate::state::{CrawlPhase, StopReason};
use crate::url::{normalize_url, scope_to_origin};
use crate::CrawlerError;
use std::collections::HashSet;
use std::time::Instant;

/// Main crawler coordinator structure
///
/// Collaborators are injected at construction; the coordinator looks
/// nothing up from process-wide state.
pub struct Coordinator {
    config: CrawlConfig,
    namespace: String,
    seed: String,
    fetcher: Box<dyn PageFetcher>,
    oracle: Box<dyn RelevanceOracle>,
    sink: Box<dyn IndexingSink>,
    phase: CrawlPhase,
    frontier: Frontier,
    visited: VisitedSet,
    results: Vec<Page>,
    failures: Vec<FailedVisit>,
    oracle_failures: usize,
    extraction_failures: usize,
    started: Option<Instant>,
}

impl Coordinator {
    /// Creates a coordinator in the `Init` phase
    ///
    /// Validates `config` and seeds the frontier with the normalized seed
    /// URL. Nothing is fetched until [`Coordinator::run`].
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl input
    /// * `namespace` - Namespace passed to the sink at completion
    /// * `fetcher` - Retrieves pages
    /// * `oracle` - Chooses which links to follow
    /// * `sink` - Receives the finished result set
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError::Config)` - The config is invalid; nothing was crawled
    pub fn new(
        config: CrawlConfig,
        namespace: impl Into<String>,
        fetcher: Box<dyn PageFetcher>,
        oracle: Box<dyn RelevanceOracle>,
        sink: Box<dyn IndexingSink>,
    ) -> Result<Self, CrawlerError> {
        config.validate()?;

        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(crate::ConfigError::Validation("namespace cannot be empty".to_string()).into());
        }

        let seed = normalize_url(&config.seed_url)?.to_string();

        let visited = VisitedSet::new();
        let mut frontier = Frontier::new();
        frontier.push(&seed, &visited);

        Ok(Self {
            config,
            namespace,
            seed,
            fetcher,
            oracle,
            sink,
            phase: CrawlPhase::Init,
            frontier,
            visited,
            results: Vec::new(),
            failures: Vec::new(),
            oracle_failures: 0,
            extraction_failures: 0,
            started: None,
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// The normalized seed URL
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Runs the crawl to completion and indexes the result set
    ///
    /// Always reaches the sink, even when the seed itself fails to fetch
    /// (the sink then gets an empty set).
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Crawl finished and was indexed
    /// * `Err(CrawlerError)` - The sink failed
    pub async fn run(mut self) -> Result<CrawlReport, CrawlerError> {
        self.transition(CrawlPhase::Running)?;
        self.started = Some(Instant::now());

        tracing::info!(
            seed = %self.seed,
            topic = %self.config.topic,
            max_pages = self.config.max_pages,
            same_domain_only = self.config.same_domain_only,
            "Starting crawl"
        );

        let stop_reason = loop {
            if let Some(reason) = self.step().await {
                break reason;
            }
        };

        self.transition(CrawlPhase::Done)?;
        tracing::info!(
            "Crawl finished ({}): {} visited, {} fetched, {} failed",
            stop_reason,
            self.visited.len(),
            self.results.len(),
            self.failures.len()
        );

        let index = self.sink.index(&self.results, &self.namespace).await?;

        Ok(CrawlReport {
            stop_reason,
            visited: self.visited.len(),
            pages: self.results.iter().map(|p| p.url.clone()).collect(),
            failures: self.failures,
            oracle_failures: self.oracle_failures,
            extraction_failures: self.extraction_failures,
            elapsed: self.started.map(|s| s.elapsed()).unwrap_or_default(),
            index,
        })
    }

    /// Runs one loop iteration
    ///
    /// Returns `Some(reason)` when the crawl should stop instead.
    async fn step(&mut self) -> Option<StopReason> {
        if let (Some(limit), Some(started)) = (self.config.time_limit, self.started) {
            if started.elapsed() >= limit {
                return Some(StopReason::DeadlineReached);
            }
        }

        if self.visited.len() >= self.config.max_pages {
            return Some(StopReason::BudgetReached);
        }

        let current = match self.frontier.pop() {
            Some(url) => url,
            None => return Some(StopReason::FrontierExhausted),
        };

        // Enqueue-time filtering should make this unreachable.
        if self.visited.contains(&current) {
            tracing::debug!(url = %current, "Skipping already visited URL");
            return None;
        }

        self.visit(current).await;
        None
    }

    /// Fetches one URL and feeds its selected links back into the frontier
    async fn visit(&mut self, current: String) {
        tracing::debug!(url = %current, "Fetching");

        let mut page = match self.fetcher.fetch(&current).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %current, kind = e.kind(), error = %e, "Fetch failed");
                self.visited.insert(&current);
                self.failures.push(FailedVisit {
                    url: current,
                    kind: e.kind(),
                    message: e.to_string(),
                });
                return;
            }
        };

        self.visited.insert(&current);
        if page.url != current {
            page.url = current.clone();
        }

        let (found, selected) = self.select_links(&mut page).await;

        let mut queued = Vec::new();
        for url in selected {
            if self.frontier.push(&url, &self.visited) {
                queued.push(url);
            }
        }

        tracing::info!(
            url = %current,
            links = found,
            queued = queued.len(),
            queue_size = self.frontier.len(),
            visited = self.visited.len(),
            "Processed page"
        );
        tracing::debug!(url = %current, "Queued: {:?}", queued);

        self.results.push(page);
    }

    /// Extracts, scopes, and asks the oracle about the page's links
    ///
    /// Returns the number of in-scope candidates and the selected URLs in the
    /// order the oracle gave them. Fills in the page title from the parsed
    /// document when the fetcher left it empty.
    async fn select_links(&mut self, page: &mut Page) -> (usize, Vec<String>) {
        let parsed = match parse_html(&page.content, &page.final_url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(url = %page.url, kind = e.kind(), error = %e, "Link extraction failed");
                self.extraction_failures += 1;
                return (0, Vec::new());
            }
        };

        if page.title.is_none() {
            page.title = parsed.title.clone();
        }

        let mut links = parsed.link_urls();
        if self.config.same_domain_only {
            links = scope_to_origin(links, &self.seed);
        }

        let mut seen = HashSet::new();
        let candidates: Vec<Candidate> = links
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .enumerate()
            .map(|(index, url)| Candidate {
                index,
                text: parsed.anchor_text(&url).to_string(),
                url,
            })
            .collect();

        let request = RelevanceRequest {
            topic: &self.config.topic,
            page_url: &page.url,
            preview: preview(&parsed.text, self.config.preview_chars),
            candidates: &candidates,
        };

        let indices = match self.oracle.select(&request).await {
            Ok(indices) => indices,
            Err(e) => {
                tracing::warn!(url = %page.url, kind = e.kind(), error = %e, "Relevance oracle failed");
                self.oracle_failures += 1;
                return (candidates.len(), Vec::new());
            }
        };

        let mut selected = Vec::with_capacity(indices.len());
        for index in indices {
            match candidates.get(index) {
                Some(candidate) => selected.push(candidate.url.clone()),
                None => tracing::debug!(
                    url = %page.url,
                    index,
                    candidates = candidates.len(),
                    "Dropping out-of-range selection"
                ),
            }
        }

        (candidates.len(), selected)
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), CrawlerError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}
