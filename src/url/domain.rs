use url::Url;

/// Extracts the host from a URL
///
/// The host is lowercased. Ports are not part of the result, so
/// `example.com:8080` and `example.com` share a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use topic_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether two URLs share an origin
///
/// Origin equality is host-based: scheme and port are ignored, so
/// `http://example.com:8080/a` and `https://example.com/b` are same-origin.
/// Subdomains are distinct hosts. Anything that fails to parse or has no host
/// is never same-origin with anything.
///
/// # Examples
///
/// ```
/// use topic_crawler::url::same_origin;
///
/// assert!(same_origin("https://example.com/a", "http://example.com/b"));
/// assert!(!same_origin("https://example.com/a", "https://docs.example.com/a"));
/// ```
pub fn same_origin(url_a: &str, url_b: &str) -> bool {
    let host = |raw: &str| Url::parse(raw).ok().and_then(|u| extract_domain(&u));

    match (host(url_a), host(url_b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
