//! Indexing sink module
//!
//! The crawler hands its finished result set to an [`IndexingSink`] exactly
//! once. Embedding, retrieval, and namespace policy belong to the sink.
//! [`SqliteSink`] is the bundled implementation.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{content_hash, IndexedPage, SqliteSink};
pub use traits::{IndexHandle, IndexingSink, SinkError, SinkResult};
