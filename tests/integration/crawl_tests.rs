//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from the HTTP fetcher through to
//! pages stored in a SQLite index.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use topic_crawler::config::{load_settings, CrawlConfig, FetcherConfig, OracleConfig};
use topic_crawler::crawler::{crawl, Coordinator, HttpFetcher};
use topic_crawler::oracle::{FollowAllOracle, LlmOracle};
use topic_crawler::sink::SqliteSink;
use topic_crawler::state::StopReason;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    let body = format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1><ul>{}</ul></body></html>",
        title, title, anchors
    );
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(title, links))
        .mount(server)
        .await;
}

fn fetcher() -> Box<HttpFetcher> {
    let config = FetcherConfig {
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
        ..FetcherConfig::default()
    };
    Box::new(HttpFetcher::new(&config).unwrap())
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        "Home",
        &["/docs", "/about", "https://elsewhere.test/page", "mailto:team@example.test"],
    )
    .await;
    mount_page(&server, "/docs", "Docs", &["/docs/deep", "/"]).await;
    mount_page(&server, "/about", "About", &[]).await;
    mount_page(&server, "/docs/deep", "Deep", &["/docs"]).await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("index.db");
    let sink = SqliteSink::open(&db_path).unwrap();

    let config = CrawlConfig::new(&base, "documentation").with_max_pages(10);
    let report = crawl(
        config,
        "docs",
        fetcher(),
        Box::new(FollowAllOracle),
        Box::new(sink),
    )
    .await
    .unwrap();

    let expected = vec![
        format!("{}/", base),
        format!("{}/docs", base),
        format!("{}/about", base),
        format!("{}/docs/deep", base),
    ];
    assert_eq!(report.pages, expected);
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert!(report.failures.is_empty());
    assert_eq!(report.index.page_count, 4);

    let index = SqliteSink::open(&db_path).unwrap();
    let stored = index.load_pages("docs").unwrap();
    let urls: Vec<_> = stored.iter().map(|p| p.url.clone()).collect();
    assert_eq!(urls, expected);
    assert_eq!(stored[1].title.as_deref(), Some("Docs"));
    assert!(stored[3].content.contains("<h1>Deep</h1>"));
}

#[tokio::test]
async fn test_crawl_respects_page_budget() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "Home", &["/1", "/2", "/3", "/4"]).await;
    for route in ["/1", "/2", "/3", "/4"] {
        mount_page(&server, route, route, &[]).await;
    }

    let sink = SqliteSink::open_in_memory().unwrap();
    let config = CrawlConfig::new(&base, "numbers").with_max_pages(3);
    let report = crawl(
        config,
        "scrapers",
        fetcher(),
        Box::new(FollowAllOracle),
        Box::new(sink),
    )
    .await
    .unwrap();

    assert_eq!(report.visited, 3);
    assert_eq!(
        report.pages,
        vec![format!("{}/", base), format!("{}/1", base), format!("{}/2", base)]
    );
    assert_eq!(report.stop_reason, StopReason::BudgetReached);
}

#[tokio::test]
async fn test_broken_pages_do_not_stop_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "Home", &["/missing", "/broken", "/ok"]).await;
    mount_page(&server, "/ok", "Ok", &[]).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let sink = SqliteSink::open_in_memory().unwrap();
    let config = CrawlConfig::new(&base, "resilience");
    let report = crawl(
        config,
        "scrapers",
        fetcher(),
        Box::new(FollowAllOracle),
        Box::new(sink),
    )
    .await
    .unwrap();

    assert_eq!(report.pages, vec![format!("{}/", base), format!("{}/ok", base)]);
    assert_eq!(report.visited, 4);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.error_summary().get("http_status"), Some(&2));
}

#[tokio::test]
async fn test_seed_failure_indexes_empty_namespace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("index.db");
    let sink = SqliteSink::open(&db_path).unwrap();

    let config = CrawlConfig::new(server.uri(), "anything");
    let report = crawl(
        config,
        "empty",
        fetcher(),
        Box::new(FollowAllOracle),
        Box::new(sink),
    )
    .await
    .unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.visited, 1);

    let index = SqliteSink::open(&db_path).unwrap();
    assert_eq!(index.page_count("empty").unwrap(), Some(0));
}

#[tokio::test]
async fn test_llm_oracle_guides_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "Home", &["/pricing", "/guides"]).await;
    mount_page(&server, "/pricing", "Pricing", &[]).await;
    mount_page(&server, "/guides", "Guides", &["/guides/rust"]).await;
    mount_page(&server, "/guides/rust", "Rust guide", &[]).await;

    // Always pick the second candidate; pages with fewer candidates get an
    // out-of-range index, which is dropped.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "1" } }]
        })))
        .mount(&server)
        .await;

    let oracle_config = OracleConfig {
        endpoint: format!("{}/v1/chat/completions", base),
        request_timeout_secs: 5,
        ..OracleConfig::default()
    };
    let oracle = LlmOracle::new(&oracle_config, "test-key").unwrap();

    let sink = SqliteSink::open_in_memory().unwrap();
    let config = CrawlConfig::new(&base, "learning rust");
    let report = Coordinator::new(config, "guides", fetcher(), Box::new(oracle), Box::new(sink))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.pages,
        vec![format!("{}/", base), format!("{}/guides", base)]
    );
    assert_eq!(report.oracle_failures, 0);
}

#[tokio::test]
async fn test_llm_oracle_outage_keeps_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "Home", &["/a", "/b"]).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let oracle_config = OracleConfig {
        endpoint: format!("{}/v1/chat/completions", base),
        request_timeout_secs: 5,
        ..OracleConfig::default()
    };
    let oracle = LlmOracle::new(&oracle_config, "test-key").unwrap();

    let sink = SqliteSink::open_in_memory().unwrap();
    let report = crawl(
        CrawlConfig::new(&base, "anything"),
        "scrapers",
        fetcher(),
        Box::new(oracle),
        Box::new(sink),
    )
    .await
    .unwrap();

    assert_eq!(report.pages, vec![format!("{}/", base)]);
    assert_eq!(report.oracle_failures, 1);
    assert_eq!(report.index.page_count, 1);
}

#[tokio::test]
async fn test_crawl_from_settings_file() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "Home", &["/next"]).await;
    mount_page(&server, "/next", "Next", &["/"]).await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[crawl]
seed = "{}"
topic = "settings"
max-pages = 5

[oracle]
kind = "follow-all"

[index]
namespace = "from-file"
"#,
        base
    )
    .unwrap();
    file.flush().unwrap();

    let settings = load_settings(file.path()).unwrap();
    let config = settings.crawl_config().unwrap();
    assert_eq!(config.max_pages, 5);

    let sink = SqliteSink::open_in_memory().unwrap();
    let report = crawl(
        config,
        &settings.index.namespace,
        fetcher(),
        Box::new(FollowAllOracle),
        Box::new(sink),
    )
    .await
    .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.index.namespace, "from-file");
}

#[test]
fn test_missing_topic_is_fatal() {
    let result = Coordinator::new(
        CrawlConfig::new("https://example.test/", ""),
        "scrapers",
        fetcher(),
        Box::new(FollowAllOracle),
        Box::new(SqliteSink::open_in_memory().unwrap()),
    );
    assert!(result.is_err());
}
