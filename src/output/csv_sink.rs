//! Delimited-file sink
//!
//! Each append opens the file in append mode, checks whether it is empty,
//! writes the header if so, then the rows, and flushes before returning. A
//! crash after any append leaves every earlier page intact on disk.

use crate::extract::Record;
use crate::output::traits::{OutputResult, Sink, SinkFactory};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Sink writing one delimited file
#[derive(Debug, Clone)]
pub struct CsvSink {
    resource_name: String,
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    /// Creates a sink for `path` without touching the filesystem
    pub fn new(resource_name: impl Into<String>, path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            resource_name: resource_name.into(),
            path: path.into(),
            delimiter,
        }
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for CsvSink {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn append(&mut self, batch: &[Record], schema: &[&str]) -> OutputResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let write_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_writer(file);

        if write_header {
            writer.write_record(schema)?;
        }

        for record in batch {
            writer.write_record(record.to_row(schema))?;
        }

        writer.flush()?;

        tracing::debug!(
            "Appended {} rows to {}",
            batch.len(),
            self.path.display()
        );

        Ok(batch.len())
    }
}

/// Opens `<directory>/<resource_name>.<extension>` sinks
#[derive(Debug, Clone)]
pub struct CsvSinkFactory {
    directory: PathBuf,
    extension: String,
}

impl CsvSinkFactory {
    pub fn new(directory: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Path the sink for `resource_name` writes to
    pub fn path_for(&self, resource_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", resource_name, self.extension))
    }

    /// Tab for `.tsv` files, comma otherwise
    fn delimiter(&self) -> u8 {
        if self.extension.eq_ignore_ascii_case("tsv") {
            b'\t'
        } else {
            b','
        }
    }
}

impl SinkFactory for CsvSinkFactory {
    type Sink = CsvSink;

    fn open(&self, resource_name: &str) -> OutputResult<CsvSink> {
        Ok(CsvSink::new(
            resource_name,
            self.path_for(resource_name),
            self.delimiter(),
        ))
    }
}
