//! Crawler module for paginated listing extraction
//!
//! This module contains the core crawling logic, including:
//! - Scraping all items of the current page
//! - The forward-only pagination loop for one target
//! - Pacing between page loads and targets
//! - Iterating the URL set with one sink per target

mod page;
mod pacing;
mod paginator;
mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use page::scrape_page;
pub use pacing::{DelayPolicy, Pacer, Pause, SleepPacer};
pub use paginator::{PaginationError, PaginationOutcome, Paginator};
pub use runner::CrawlRunner;
