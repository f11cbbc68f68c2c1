//! Relevance oracle trait and error types

use async_trait::async_trait;
use thiserror::Error;

/// Errors a relevance oracle can report
///
/// All of them are recoverable: the coordinator treats any oracle error as
/// an empty selection for that page.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Malformed selection: {0}")]
    Malformed(String),

    #[error("Oracle request failed: {0}")]
    Request(String),

    #[error("Oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Oracle returned no answer")]
    EmptyResponse,
}

impl OracleError {
    /// Stable snake_case name of the error kind, for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_selection",
            Self::Request(_) => "oracle_request",
            Self::Status { .. } => "oracle_status",
            Self::EmptyResponse => "empty_response",
        }
    }
}

/// A link the oracle may choose to follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position in the candidate list; what the oracle answers with
    pub index: usize,

    /// Absolute URL
    pub url: String,

    /// Anchor text shown alongside the URL
    pub text: String,
}

/// Everything an oracle gets to see about one page
#[derive(Debug, Clone, Copy)]
pub struct RelevanceRequest<'a> {
    /// What the crawl is about
    pub topic: &'a str,

    /// The page the candidates were found on
    pub page_url: &'a str,

    /// Bounded preview of the page's visible text
    pub preview: &'a str,

    /// Indexed candidate links, `candidates[i].index == i`
    pub candidates: &'a [Candidate],
}

/// Decides which discovered links are worth following
///
/// Implementations answer with candidate indices, in the order they should
/// be enqueued. Any number of indices is acceptable, including none. Indices
/// outside the candidate range are dropped by the caller.
#[async_trait]
pub trait RelevanceOracle: Send + Sync {
    async fn select(&self, request: &RelevanceRequest<'_>) -> Result<Vec<usize>, OracleError>;
}
