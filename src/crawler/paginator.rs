//! Page-to-page traversal for one crawl target
//!
//! The paginator scrapes the current page, appends the batch to the target's
//! sink, then looks for the next-page control. It advances only after a
//! successful activation and stops for good on the first failure, so it
//! halts even when a broken control is present on every page.

use crate::browser::Browser;
use crate::crawler::page::scrape_page;
use crate::crawler::pacing::{Pacer, Pause};
use crate::extract::{FieldMap, Locator};
use crate::output::Sink;
use crate::state::{PaginationEnd, PaginatorState};
use crate::HarvestError;
use thiserror::Error;
use tracing::{info, warn};

/// What a completed pagination run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOutcome {
    /// Page indexes scraped, in visit order
    pub visited: Vec<usize>,

    /// Data rows appended to the sink
    pub rows: usize,

    pub end: PaginationEnd,

    /// Why the next-page control could not be used, if it could not
    pub failure: Option<String>,
}

impl PaginationOutcome {
    /// Number of pages scraped
    pub fn pages(&self) -> usize {
        self.visited.len()
    }
}

/// A pagination run stopped by an error
///
/// Pages appended before the error stay persisted; `pages` and `rows` count
/// them.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct PaginationError {
    /// Pages scraped and appended before the error
    pub pages: usize,

    /// Data rows appended before the error
    pub rows: usize,

    pub source: HarvestError,
}

impl PaginationError {
    pub fn new(source: impl Into<HarvestError>, pages: usize, rows: usize) -> Self {
        Self {
            pages,
            rows,
            source: source.into(),
        }
    }
}

/// Drives the `Scraping(n)` / `Done` state machine for one target
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    item_locator: &'a Locator,
    next_page_locator: &'a Locator,
    max_pages: Option<usize>,
}

impl<'a> Paginator<'a> {
    pub fn new(
        item_locator: &'a Locator,
        next_page_locator: &'a Locator,
        max_pages: Option<usize>,
    ) -> Self {
        Self {
            item_locator,
            next_page_locator,
            max_pages,
        }
    }

    /// Runs pagination from the browser's current page to completion
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationOutcome)` - Pagination ended, normally or degraded
    /// * `Err(PaginationError)` - A sink write failed or a locator is
    ///   malformed, with the pages and rows appended before it
    pub async fn run<B, S, P>(
        &self,
        browser: &mut B,
        field_map: &FieldMap,
        sink: &mut S,
        pacer: &mut P,
    ) -> Result<PaginationOutcome, PaginationError>
    where
        B: Browser + ?Sized,
        S: Sink + ?Sized,
        P: Pacer + ?Sized,
    {
        let schema = field_map.schema();
        let mut state = PaginatorState::initial();
        let mut visited = Vec::new();
        let mut rows = 0;
        let mut failure = None;

        let end = loop {
            let index = match state {
                PaginatorState::Scraping(index) => index,
                PaginatorState::Done(end) => break end,
            };

            info!("{}: page {}", sink.resource_name(), index + 1);

            let batch = scrape_page(&*browser, self.item_locator, field_map, index)
                .await
                .map_err(|e| PaginationError::new(e, visited.len(), rows))?;
            let appended = sink
                .append(&batch, &schema)
                .map_err(|e| PaginationError::new(e, visited.len(), rows))?;
            rows += appended;
            visited.push(index);

            let partial = |e: HarvestError| PaginationError::new(e, visited.len(), rows);

            if self.max_pages.is_some_and(|max| visited.len() >= max) {
                info!("{}: page limit reached", sink.resource_name());
                state = state.finish(PaginationEnd::PageLimit).map_err(partial)?;
                continue;
            }

            let control = match browser.find_one(self.next_page_locator, None).await {
                Ok(control) => control,
                Err(e) if e.is_config() => return Err(partial(e.into())),
                Err(e) => {
                    warn!("{}: next-page lookup failed: {}", sink.resource_name(), e);
                    failure = Some(e.to_string());
                    state = state
                        .finish(PaginationEnd::ActivationFailed)
                        .map_err(partial)?;
                    continue;
                }
            };

            let Some(control) = control else {
                info!("{}: no next page after page {}", sink.resource_name(), index + 1);
                state = state.finish(PaginationEnd::LastPage).map_err(partial)?;
                continue;
            };

            match browser.activate(&control).await {
                Ok(()) => {
                    pacer.pause(Pause::PageSettle).await;
                    state = state.advance().map_err(partial)?;
                }
                Err(e) => {
                    warn!(
                        "{}: failed to open next page after page {}: {}",
                        sink.resource_name(),
                        index + 1,
                        e
                    );
                    failure = Some(e.to_string());
                    state = state
                        .finish(PaginationEnd::ActivationFailed)
                        .map_err(partial)?;
                }
            }
        };

        Ok(PaginationOutcome {
            visited,
            rows,
            end,
            failure,
        })
    }
}
