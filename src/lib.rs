//! Listing Harvester: a paginating listing-page scraper
//!
//! This crate drives a browser session across a fixed set of listing URLs,
//! extracts configured fields from every item on each result page, follows the
//! "next page" control, and appends the records to one delimited file per URL.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid paginator transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PaginatorState,
        to: state::PaginatorState,
    },

    #[error("All {failed} crawl targets failed")]
    AllTargetsFailed { failed: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid locator '{locator}': {message}")]
    InvalidLocator { locator: String, message: String },
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlTarget};
pub use crawler::CrawlRunner;
pub use extract::{FieldMap, FieldValue, Record};
pub use output::RunSummary;
pub use state::PaginatorState;
