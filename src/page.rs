//! The unit of crawl output

use chrono::{DateTime, Utc};

/// A successfully fetched page
///
/// Created by a [`PageFetcher`](crate::crawler::PageFetcher), read by the link
/// extractor and the relevance oracle, then kept in the coordinator's result
/// set until the final hand-off to the indexing sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The normalized URL that was requested (the page's identity)
    pub url: String,

    /// Where the fetch actually ended up after redirects
    pub final_url: String,

    /// Rendered markup of the page
    pub content: String,

    /// Page title, if one could be extracted
    pub title: Option<String>,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// Creates a page whose final URL equals the requested URL
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            content: content.into(),
            title: None,
            fetched_at: Utc::now(),
        }
    }

    /// Sets the final URL reached after redirects
    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = final_url.into();
        self
    }

    /// Sets the page title
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}
