//! Topic-Crawler main entry point
//!
//! This is the command-line interface for the topic-guided crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use topic_crawler::config::{
    load_settings, validate_settings, CrawlConfig, FetchMode, FetcherConfig, OracleKind, Settings,
};
use topic_crawler::crawler::{crawl, HttpFetcher, PageFetcher};
use topic_crawler::oracle::{FollowAllOracle, LlmOracle, RelevanceOracle};
use topic_crawler::output::{print_report, report_json};
use topic_crawler::sink::SqliteSink;
use tracing_subscriber::EnvFilter;

/// Topic-Crawler: a topic-guided, bounded web crawler
///
/// Starting from SEED, Topic-Crawler fetches pages breadth-first, asks a
/// language model which links are relevant to the topic, and indexes the
/// visited pages into a SQLite database under a namespace.
#[derive(Parser, Debug)]
#[command(name = "topic-crawler")]
#[command(version)]
#[command(about = "A topic-guided, bounded web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// What the crawl is about; guides link selection
    #[arg(short, long)]
    topic: Option<String>,

    /// Maximum number of pages to visit (default 50)
    #[arg(short = 'n', long)]
    max_pages: Option<usize>,

    /// Index namespace (default "scrapers")
    #[arg(long)]
    namespace: Option<String>,

    /// Path to TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Follow links to other hosts too
    #[arg(long)]
    all_domains: bool,

    /// Follow every link instead of asking the language model
    #[arg(long)]
    follow_all: bool,

    /// Render pages in headless Chromium (requires the `browser` feature)
    #[arg(long)]
    browser: bool,

    /// Path to the SQLite index database
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Stop crawling after this many seconds
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Validate configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?
        }
        None => Settings::default(),
    };
    apply_cli_overrides(&mut settings, &cli);

    validate_settings(&settings).context("invalid settings")?;
    let config = settings.crawl_config().context("invalid crawl input")?;

    if cli.dry_run {
        handle_dry_run(&config, &settings);
        return Ok(());
    }

    handle_crawl(config, &settings, cli.json).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("topic_crawler=info,warn"),
            1 => EnvFilter::new("topic_crawler=debug,info"),
            2 => EnvFilter::new("topic_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Layers command-line flags over the settings file
fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(seed) = &cli.seed {
        settings.crawl.seed = Some(seed.clone());
    }
    if let Some(topic) = &cli.topic {
        settings.crawl.topic = Some(topic.clone());
    }
    if let Some(max_pages) = cli.max_pages {
        settings.crawl.max_pages = max_pages;
    }
    if cli.all_domains {
        settings.crawl.same_domain_only = false;
    }
    if let Some(secs) = cli.time_limit {
        settings.crawl.time_limit_secs = Some(secs);
    }
    if let Some(namespace) = &cli.namespace {
        settings.index.namespace = namespace.clone();
    }
    if let Some(database) = &cli.database {
        settings.index.database_path = database.display().to_string();
    }
    if cli.follow_all {
        settings.oracle.kind = OracleKind::FollowAll;
    }
    if cli.browser {
        settings.fetcher.mode = FetchMode::Browser;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &CrawlConfig, settings: &Settings) {
    println!("=== Topic-Crawler Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", config.seed_url);
    println!("  Topic: {}", config.topic);
    println!("  Max pages: {}", config.max_pages);
    println!("  Same domain only: {}", config.same_domain_only);
    println!("  Preview chars: {}", config.preview_chars);
    match config.time_limit {
        Some(limit) => println!("  Time limit: {}s", limit.as_secs()),
        None => println!("  Time limit: none"),
    }

    println!("\nFetcher:");
    println!("  Mode: {:?}", settings.fetcher.mode);
    println!("  User agent: {}", settings.fetcher.user_agent);
    println!("  Request timeout: {}s", settings.fetcher.request_timeout_secs);

    println!("\nOracle:");
    match settings.oracle.kind {
        OracleKind::Llm => {
            println!("  Model: {}", settings.oracle.model);
            println!("  Endpoint: {}", settings.oracle.endpoint);
            println!("  API key from: ${}", settings.oracle.api_key_env);
        }
        OracleKind::FollowAll => println!("  Follow all links"),
    }

    println!("\nIndex:");
    println!("  Namespace: {}", settings.index.namespace);
    println!("  Database: {}", settings.index.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig, settings: &Settings, json: bool) -> anyhow::Result<()> {
    let oracle: Box<dyn RelevanceOracle> = match settings.oracle.kind {
        OracleKind::Llm => Box::new(LlmOracle::from_env(&settings.oracle)?),
        OracleKind::FollowAll => Box::new(FollowAllOracle),
    };

    let fetcher: Box<dyn PageFetcher> = match settings.fetcher.mode {
        FetchMode::Http => Box::new(
            HttpFetcher::new(&settings.fetcher).context("failed to build HTTP client")?,
        ),
        FetchMode::Browser => browser_fetcher(&settings.fetcher).await?,
    };

    let sink = SqliteSink::open(Path::new(&settings.index.database_path)).with_context(|| {
        format!(
            "failed to open index database {}",
            settings.index.database_path
        )
    })?;

    let report = match crawl(
        config,
        &settings.index.namespace,
        fetcher,
        oracle,
        Box::new(sink),
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        print_report(&report);
    }

    Ok(())
}

#[cfg(feature = "browser")]
async fn browser_fetcher(config: &FetcherConfig) -> anyhow::Result<Box<dyn PageFetcher>> {
    let fetcher = topic_crawler::crawler::BrowserFetcher::launch(config)
        .await
        .context("failed to launch headless browser")?;
    Ok(Box::new(fetcher))
}

#[cfg(not(feature = "browser"))]
async fn browser_fetcher(_config: &FetcherConfig) -> anyhow::Result<Box<dyn PageFetcher>> {
    anyhow::bail!("browser mode requires building with `--features browser`")
}
