//! Output module for persisting records and reporting runs
//!
//! This module handles:
//! - Appending page batches to per-target delimited files
//! - Collecting and printing per-target run statistics

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::{CsvSink, CsvSinkFactory};
pub use stats::{print_summary, RunSummary, TargetOutcome, TargetReport};
pub use traits::{OutputError, OutputResult, Sink, SinkFactory};
