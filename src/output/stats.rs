//! Crawl report and statistics
//!
//! The coordinator summarizes every run in a [`CrawlReport`]; the binary
//! renders it for humans.

use crate::sink::IndexHandle;
use crate::state::StopReason;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

/// A URL that was visited but could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedVisit {
    pub url: String,

    /// Stable error kind, e.g. `navigation_timeout`
    pub kind: &'static str,

    pub message: String,
}

/// Outcome of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Why the loop stopped
    pub stop_reason: StopReason,

    /// Distinct URLs visited, including failed fetches
    pub visited: usize,

    /// URLs of successfully fetched pages, in visit order
    pub pages: Vec<String>,

    /// Visits whose fetch failed
    pub failures: Vec<FailedVisit>,

    /// Pages whose oracle call failed (treated as an empty selection)
    pub oracle_failures: usize,

    /// Pages whose links could not be extracted
    pub extraction_failures: usize,

    /// Time from the first fetch to the sink hand-off
    pub elapsed: Duration,

    /// Handle returned by the indexing sink
    pub index: IndexHandle,
}

impl CrawlReport {
    /// Failure counts keyed by error kind
    pub fn error_summary(&self) -> BTreeMap<&'static str, usize> {
        let mut summary = BTreeMap::new();
        for failure in &self.failures {
            *summary.entry(failure.kind).or_insert(0) += 1;
        }
        summary
    }

    /// Share of visits that produced a page, in percent
    pub fn success_rate(&self) -> f64 {
        if self.visited == 0 {
            0.0
        } else {
            (self.pages.len() as f64 / self.visited as f64) * 100.0
        }
    }
}

/// Renders a report as plain text
pub fn render_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Report ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Stopped: {}", report.stop_reason);
    let _ = writeln!(out, "  Pages visited: {}", report.visited);
    let _ = writeln!(out, "  Pages fetched: {}", report.pages.len());
    let _ = writeln!(out, "  Failed fetches: {}", report.failures.len());
    let _ = writeln!(out, "  Oracle failures: {}", report.oracle_failures);
    let _ = writeln!(out, "  Extraction failures: {}", report.extraction_failures);
    let _ = writeln!(out, "  Elapsed: {:.1?}", report.elapsed);
    let _ = writeln!(out);

    if !report.failures.is_empty() {
        let _ = writeln!(out, "Error Summary:");
        let mut counts: Vec<_> = report.error_summary().into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        for (kind, count) in counts {
            let _ = writeln!(out, "  {}: {}", kind, count);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Failed URLs:");
        for failure in &report.failures {
            let _ = writeln!(out, "  - {} ({})", failure.url, failure.kind);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Index: {} pages in namespace '{}' at {}",
        report.index.page_count, report.index.namespace, report.index.location
    );
    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages successfully fetched)",
        report.success_rate(),
        report.pages.len(),
        report.visited
    );

    out
}

/// Renders a report as a JSON document for scripting
pub fn report_json(report: &CrawlReport) -> serde_json::Value {
    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|f| json!({ "url": f.url, "kind": f.kind, "message": f.message }))
        .collect();

    json!({
        "stop_reason": report.stop_reason.to_string(),
        "visited": report.visited,
        "pages": report.pages,
        "failures": failures,
        "oracle_failures": report.oracle_failures,
        "extraction_failures": report.extraction_failures,
        "elapsed_ms": report.elapsed.as_millis() as u64,
        "index": {
            "namespace": report.index.namespace,
            "page_count": report.index.page_count,
            "location": report.index.location,
        },
    })
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", render_report(report));
}
