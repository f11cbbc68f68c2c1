//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the coordinator's lifecycle (`Init → Running → Done`)
//! - `StopReason`: why a crawl left the running phase

mod crawl_phase;

pub use crawl_phase::{CrawlPhase, StopReason};
