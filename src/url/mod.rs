//! URL handling module for Topic-Crawler
//!
//! This module provides URL normalization, host extraction, and the
//! same-origin check used for domain scoping.

mod domain;
mod normalize;

pub use domain::{extract_domain, same_origin};
pub use normalize::normalize_url;

/// Keeps only the links that share an origin with `seed`
///
/// Order is preserved. This is the domain scoper applied to every page's
/// extracted links when same-domain-only crawling is on.
///
/// # Examples
///
/// ```
/// use topic_crawler::url::scope_to_origin;
///
/// let links = vec![
///     "https://example.test/b".to_string(),
///     "https://elsewhere.test/".to_string(),
///     "https://example.test/c".to_string(),
/// ];
/// let scoped = scope_to_origin(links, "https://example.test/a");
/// assert_eq!(scoped, vec!["https://example.test/b", "https://example.test/c"]);
/// ```
pub fn scope_to_origin(links: Vec<String>, seed: &str) -> Vec<String> {
    links
        .into_iter()
        .filter(|link| same_origin(link, seed))
        .collect()
}
