use crate::UrlError;
use url::Url;

/// Normalizes a URL according to the crawler's identity rules
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Accept only HTTP and HTTPS schemes
/// 3. Require a host
/// 4. Remove fragment (everything after #)
///
/// Host lowercasing and default-port removal come from the parser itself.
/// Trailing slashes are kept: `/docs` and `/docs/` are distinct pages.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use topic_crawler::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/page/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
