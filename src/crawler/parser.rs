//! HTML parser for extracting links, text, and metadata
//!
//! This module handles parsing page markup to extract:
//! - Links to consider following (from `<a href>` tags), with their anchor text
//! - The visible page text, used for the relevance oracle's preview
//! - The page title

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Anchor text used when a link has no visible text
pub const NO_DESCRIPTION: &str = "No description";

/// Errors raised while extracting links from a page
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl ExtractionError {
    /// Stable snake_case name of the error kind, for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl { .. } => "invalid_base_url",
        }
    }
}

/// A hyperlink found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute, fragment-free URL
    pub url: String,

    /// Visible anchor text, whitespace collapsed (may be empty)
    pub text: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from `<title>`)
    pub title: Option<String>,

    /// Visible body text with whitespace collapsed
    pub text: String,

    /// Links in document order; duplicates are kept
    pub links: Vec<Link>,
}

impl ParsedPage {
    /// Link URLs only, in document order
    pub fn link_urls(&self) -> Vec<String> {
        self.links.iter().map(|l| l.url.clone()).collect()
    }

    /// Anchor text of the first link pointing at `url`
    ///
    /// Falls back to [`NO_DESCRIPTION`] when the URL is unknown or its first
    /// anchor has no text.
    pub fn anchor_text(&self, url: &str) -> &str {
        self.links
            .iter()
            .find(|l| l.url == url)
            .map(|l| l.text.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }
}

/// Parses HTML content and extracts links, text, and title
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">`, resolved against `base_url`.
///
/// **Exclude:**
/// - fragment-only targets (`#section`)
/// - `mailto:` and `tel:` targets
/// - anything that does not resolve to an HTTP(S) URL (`javascript:`, `data:`, ...)
///
/// Fragments are stripped from resolved URLs; trailing slashes are kept.
/// Malformed markup never fails: the HTML5 parser recovers, at worst yielding
/// no links. The only error is an unusable `base_url`.
///
/// # Example
///
/// ```
/// use topic_crawler::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page#x">Link</a></body></html>"#;
/// let parsed = parse_html(html, "https://example.com/").unwrap();
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].url, "https://example.com/page");
/// assert_eq!(parsed.links[0].text, "Link");
/// ```
pub fn parse_html(html: &str, base_url: &str) -> Result<ParsedPage, ExtractionError> {
    let base = Url::parse(base_url).map_err(|e| ExtractionError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);

    Ok(ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_anchor_links(&document, &base),
    })
}

/// Extracts link URLs only
///
/// This is the link extractor contract: a pure function of the markup and
/// base URL, returning absolute URLs in document order without collapsing
/// duplicates.
pub fn extract_links(html: &str, base_url: &str) -> Result<Vec<String>, ExtractionError> {
    parse_html(html, base_url).map(|parsed| parsed.link_urls())
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Collects text nodes outside of head, script, style, and noscript
fn extract_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().is_some_and(|el| {
                matches!(el.name(), "head" | "script" | "style" | "noscript" | "template")
            })
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    collapse_whitespace(&parts.join(" "))
}

/// Extracts all followable `<a href>` links from the document
fn extract_anchor_links(document: &Html, base_url: &Url) -> Vec<Link> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url) {
                    links.push(Link {
                        url,
                        text: anchor_text(&element),
                    });
                }
            }
        }
    }

    links
}

fn anchor_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/dir/page";

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test
            Page </title></head><body></body></html>"#;
        let parsed = parse_html(html, BASE).unwrap();
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let parsed = parse_html("<html><body></body></html>", BASE).unwrap();
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://other.com/page">Link</a>"#;
        let links = extract_links(html, BASE).unwrap();
        assert_eq!(links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_root_relative_link() {
        let links = extract_links(r#"<a href="/other">Link</a>"#, BASE).unwrap();
        assert_eq!(links, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_path_relative_link() {
        let links = extract_links(r#"<a href="sibling">Link</a>"#, BASE).unwrap();
        assert_eq!(links, vec!["https://example.com/dir/sibling"]);
    }

    #[test]
    fn test_extract_parent_relative_link() {
        let links = extract_links(r#"<a href="../up/">Up</a>"#, BASE).unwrap();
        assert_eq!(links, vec!["https://example.com/up/"]);
    }

    #[test]
    fn test_strips_fragment_keeps_trailing_slash() {
        let links = extract_links(r#"<a href="/docs/#install">Docs</a>"#, BASE).unwrap();
        assert_eq!(links, vec!["https://example.com/docs/"]);
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<a href="#section">Jump</a>"##;
        assert!(extract_links(html, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_skip_mailto_and_tel() {
        let html = r#"
            <a href="mailto:test@example.com">Email</a>
            <a href="MAILTO:TEST@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
        "#;
        assert!(extract_links(html, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_skip_non_http_schemes() {
        let html = r#"
            <a href="javascript:void(0)">JS</a>
            <a href="data:text/html,hi">Data</a>
            <a href="ftp://example.com/file">FTP</a>
        "#;
        assert!(extract_links(html, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_skip_empty_href() {
        let html = r#"<a href="">Empty</a><a href="   ">Blank</a><a>No href</a>"#;
        assert!(extract_links(html, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_document_order_and_duplicates_kept() {
        let html = r#"
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="/b">B again</a>
        "#;
        let links = extract_links(html, BASE).unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[test]
    fn test_anchor_text() {
        let html = r#"<a href="/guide"> Getting <b>started</b>
            guide </a><a href="/img"><img src="x.png"></a>"#;
        let parsed = parse_html(html, BASE).unwrap();
        assert_eq!(parsed.links[0].text, "Getting started guide");
        assert_eq!(parsed.anchor_text("https://example.com/guide"), "Getting started guide");
        assert_eq!(parsed.anchor_text("https://example.com/img"), NO_DESCRIPTION);
        assert_eq!(parsed.anchor_text("https://example.com/missing"), NO_DESCRIPTION);
    }

    #[test]
    fn test_anchor_text_uses_first_occurrence() {
        let html = r#"<a href="/x">First</a><a href="/x">Second</a>"#;
        let parsed = parse_html(html, BASE).unwrap();
        assert_eq!(parsed.anchor_text("https://example.com/x"), "First");
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = r#"
            <html>
            <head><title>Title</title><style>body { color: red; }</style></head>
            <body>
                <h1>Hello</h1>
                <script>var hidden = 1;</script>
                <p>world   and
                   more</p>
                <noscript>enable js</noscript>
            </body>
            </html>
        "#;
        let parsed = parse_html(html, BASE).unwrap();
        assert_eq!(parsed.text, "Hello world and more");
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let html = r#"<html><body><div><a href="/ok">ok<p></div></span><a href="/also""#;
        let links = extract_links(html, BASE).unwrap();
        assert_eq!(links[0], "https://example.com/ok");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = extract_links("<a href='/x'>x</a>", "not a base").unwrap_err();
        assert_eq!(err.kind(), "invalid_base_url");
    }
}
