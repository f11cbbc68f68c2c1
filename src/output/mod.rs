//! Output module for crawl results
//!
//! Holds the per-run [`CrawlReport`] and its plain-text and JSON renderings.

mod stats;

pub use stats::{print_report, render_report, report_json, CrawlReport, FailedVisit};
