use crate::oracle::traits::{OracleError, RelevanceOracle, RelevanceRequest};
use async_trait::async_trait;

/// Oracle that follows every candidate, in candidate order
///
/// Turns the crawl into a plain breadth-first walk bounded by the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowAllOracle;

#[async_trait]
impl RelevanceOracle for FollowAllOracle {
    async fn select(&self, request: &RelevanceRequest<'_>) -> Result<Vec<usize>, OracleError> {
        Ok((0..request.candidates.len()).collect())
    }
}
