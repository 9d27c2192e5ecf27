//! Run statistics
//!
//! This module collects the per-target outcome of a crawl and prints the
//! end-of-run summary.

use crate::state::PaginationEnd;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// How a crawl target finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Pagination ran to its normal end
    Completed(PaginationEnd),

    /// The next-page control could not be activated; earlier pages are kept
    Degraded(String),

    /// A target-level error stopped processing
    Failed(String),
}

impl TargetOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of processing one crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    /// Output resource name
    pub name: String,

    /// Source URL
    pub url: String,

    /// Pages scraped
    pub pages: usize,

    /// Data rows appended to the resource
    pub rows: usize,

    pub outcome: TargetOutcome,
}

/// Summary of a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub targets: Vec<TargetReport>,
}

impl RunSummary {
    /// Creates an empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            targets: Vec::new(),
        }
    }

    /// Total pages scraped across all targets
    pub fn total_pages(&self) -> usize {
        self.targets.iter().map(|t| t.pages).sum()
    }

    /// Total rows written across all targets
    pub fn total_rows(&self) -> usize {
        self.targets.iter().map(|t| t.rows).sum()
    }

    /// Number of targets that failed
    pub fn failed_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.outcome.is_failed()).count()
    }

    /// Returns true if there was at least one target and all of them failed
    pub fn all_failed(&self) -> bool {
        !self.targets.is_empty() && self.failed_targets() == self.targets.len()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!(
        "Started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    println!("Targets ({}):", summary.targets.len());
    for target in &summary.targets {
        let outcome = match &target.outcome {
            TargetOutcome::Completed(end) => format!("completed ({})", end),
            TargetOutcome::Degraded(reason) => format!("degraded: {}", reason),
            TargetOutcome::Failed(reason) => format!("FAILED: {}", reason),
        };
        println!(
            "  - {}: {} pages, {} rows, {}",
            target.name, target.pages, target.rows, outcome
        );
    }
    println!();

    println!(
        "Total: {} pages, {} rows, {} failed targets",
        summary.total_pages(),
        summary.total_rows(),
        summary.failed_targets()
    );
}
