//! Sink traits and types
//!
//! This module defines the trait interface for persistence targets. A sink
//! owns one output resource and only ever appends to it.

use crate::extract::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only persistence target for one crawl target's records
///
/// Appends to the same resource must be serialized by the caller.
pub trait Sink {
    /// Name of the resource this sink writes to
    fn resource_name(&self) -> &str;

    /// Appends a batch of records as rows in `schema` order
    ///
    /// A header row equal to `schema` is written first if the resource was
    /// empty or missing. Returns the number of data rows written.
    ///
    /// # Arguments
    ///
    /// * `batch` - Records of one page, in page order
    /// * `schema` - Column names in output order
    fn append(&mut self, batch: &[Record], schema: &[&str]) -> OutputResult<usize>;
}

/// Opens a fresh sink per crawl target
pub trait SinkFactory {
    type Sink: Sink;

    /// Opens the sink bound to `resource_name`
    fn open(&self, resource_name: &str) -> OutputResult<Self::Sink>;
}
