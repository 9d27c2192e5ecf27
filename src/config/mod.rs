//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating the two TOML inputs:
//! the scraper configuration (locators, pacing, output) and the URL set.
//!
//! # Example
//!
//! ```no_run
//! use listing_harvester::config::{build_field_map, load_config, load_targets};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! let targets = load_targets(Path::new("targets.toml")).unwrap();
//! let fields = build_field_map(&config).unwrap();
//! println!("{} targets, columns {:?}", targets.len(), fields.schema());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserEngine, BrowserSettings, Config, CrawlTarget, CrawlerSettings, DelayRange,
    ExtractionSettings, OutputSettings, SelectorEntry,
};

// Re-export parser functions
pub use parser::{
    build_field_map, compute_config_hash, load_config, load_config_with_hash, load_targets,
    parse_config, parse_targets,
};
