use serde::Deserialize;
use std::time::Duration;

/// Default page budget when none is given
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Default namespace handed to the indexing sink
pub const DEFAULT_NAMESPACE: &str = "scrapers";

/// Default length of the page-text preview shown to the relevance oracle
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Immutable input of a single crawl
///
/// Build with [`CrawlConfig::new`] and the `with_*` methods, then check it
/// with [`CrawlConfig::validate`]. The coordinator refuses to start on an
/// invalid config.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Where the crawl starts
    pub seed_url: String,

    /// What the relevance oracle should steer toward
    pub topic: String,

    /// Maximum number of distinct URLs visited (fetched or failed)
    pub max_pages: usize,

    /// Only follow links sharing the seed's host
    pub same_domain_only: bool,

    /// Number of characters of page text previewed to the oracle
    pub preview_chars: usize,

    /// Optional wall-clock limit, checked once per loop iteration
    pub time_limit: Option<Duration>,
}

impl CrawlConfig {
    /// Creates a config with default budget and scoping
    pub fn new(seed_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            topic: topic.into(),
            max_pages: DEFAULT_MAX_PAGES,
            same_domain_only: true,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            time_limit: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_same_domain_only(mut self, same_domain_only: bool) -> Self {
        self.same_domain_only = same_domain_only;
        self
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }
}

/// Settings file layout
///
/// Every section and key is optional. CLI flags are layered on top by the
/// binary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub crawl: CrawlSection,
    pub fetcher: FetcherConfig,
    pub oracle: OracleConfig,
    pub index: IndexConfig,
}

/// `[crawl]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlSection {
    /// Seed URL; may instead be given on the command line
    pub seed: Option<String>,

    /// Crawl topic; may instead be given on the command line
    pub topic: Option<String>,

    pub max_pages: usize,

    pub same_domain_only: bool,

    pub preview_chars: usize,

    /// Crawl deadline in seconds
    pub time_limit_secs: Option<u64>,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            seed: None,
            topic: None,
            max_pages: DEFAULT_MAX_PAGES,
            same_domain_only: true,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            time_limit_secs: None,
        }
    }
}

/// Which page fetcher to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMode {
    /// Plain HTTP GET, raw response body
    Http,
    /// Headless Chromium, rendered DOM
    Browser,
}

/// `[fetcher]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    pub mode: FetchMode,

    /// User agent sent with every request
    pub user_agent: String,

    /// Total time allowed for one HTTP request
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection
    pub connect_timeout_secs: u64,

    /// Time allowed for a browser navigation to commit
    pub navigation_timeout_secs: u64,

    /// Settle time after load for client-side rendering (browser only)
    pub render_wait_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            mode: FetchMode::Http,
            user_agent: format!("TopicCrawler/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            navigation_timeout_secs: 30,
            render_wait_ms: 1000,
        }
    }
}

/// Which relevance oracle to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OracleKind {
    /// Ask a language model through a chat-completions endpoint
    Llm,
    /// Follow every candidate link
    FollowAll,
}

/// `[oracle]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OracleConfig {
    pub kind: OracleKind,

    /// OpenAI-compatible chat-completions URL
    pub endpoint: String,

    pub model: String,

    pub temperature: f32,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    pub request_timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleKind::Llm,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.2,
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// `[index]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexConfig {
    /// Namespace the crawl is indexed under
    pub namespace: String,

    /// Path to the SQLite index database
    pub database_path: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            database_path: "./crawl_index.db".to_string(),
        }
    }
}
