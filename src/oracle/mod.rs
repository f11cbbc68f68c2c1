//! Relevance oracle module
//!
//! The oracle is the crawler's only judgement call: given a topic, a bounded
//! preview of a page, and an indexed list of candidate links, it answers with
//! the indices worth following. The coordinator depends only on the
//! [`RelevanceOracle`] trait.
//!
//! Implementations:
//! - [`LlmOracle`]: asks a language model through a chat-completions endpoint
//! - [`FollowAllOracle`]: follows everything (topic-blind breadth-first crawl)

mod follow_all;
mod llm;
mod prompt;
mod traits;

pub use follow_all::FollowAllOracle;
pub use llm::LlmOracle;
pub use prompt::{build_selection_prompt, parse_selection, preview, SYSTEM_PROMPT};
pub use traits::{Candidate, OracleError, RelevanceOracle, RelevanceRequest};
