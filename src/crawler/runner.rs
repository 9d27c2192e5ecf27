//! Crawl runner - iterates the URL set
//!
//! For each target, in order, the runner:
//! - navigates the browser to the target URL and waits for the initial load
//! - opens a fresh sink bound to the target name
//! - paginates the target to completion
//! - waits before the next target
//!
//! A target that fails (navigation or write error) is logged and skipped.
//! Configuration errors abort the run. The browser is released whether the
//! run succeeded or not.

use crate::browser::Browser;
use crate::config::{CrawlTarget, CrawlerSettings};
use crate::crawler::pacing::{Pacer, Pause};
use crate::crawler::paginator::{PaginationError, PaginationOutcome, Paginator};
use crate::extract::{FieldMap, Locator};
use crate::output::{RunSummary, SinkFactory, TargetOutcome, TargetReport};
use crate::{ConfigResult, HarvestError};
use std::time::Instant;
use tracing::{error, info, warn};

/// Owns the browser session for a whole run
pub struct CrawlRunner<B, P, F> {
    browser: B,
    pacer: P,
    sinks: F,
    item_locator: Locator,
    next_page_locator: Locator,
    max_pages: Option<usize>,
}

impl<B, P, F> CrawlRunner<B, P, F>
where
    B: Browser,
    P: Pacer,
    F: SinkFactory,
{
    /// Creates a runner
    ///
    /// # Arguments
    ///
    /// * `browser` - The session used for every target
    /// * `pacer` - Performs the initial-load, page-settle and between-target waits
    /// * `sinks` - Opens one sink per target
    /// * `settings` - Item and next-page locators, page limit
    pub fn new(browser: B, pacer: P, sinks: F, settings: &CrawlerSettings) -> ConfigResult<Self> {
        Ok(Self {
            browser,
            pacer,
            sinks,
            item_locator: Locator::parse(&settings.item_locator)?,
            next_page_locator: Locator::parse(&settings.next_page_locator)?,
            max_pages: settings.max_pages,
        })
    }

    /// The browser session
    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// The pacer
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Crawls every target in order, then releases the browser
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - At least one target did not fail (or there were none)
    /// * `Err(HarvestError::AllTargetsFailed)` - Every target failed
    /// * `Err(HarvestError)` - A configuration error aborted the run
    pub async fn run(
        &mut self,
        targets: &[CrawlTarget],
        field_map: &FieldMap,
    ) -> Result<RunSummary, HarvestError> {
        let started = Instant::now();
        let mut summary = RunSummary::new();

        let result = self
            .run_targets(targets, field_map, &mut summary, started)
            .await;
        summary.elapsed = started.elapsed();

        if let Err(e) = self.browser.release().await {
            warn!("Failed to release browser: {}", e);
        }

        result?;

        if summary.all_failed() {
            return Err(HarvestError::AllTargetsFailed {
                failed: summary.failed_targets(),
            });
        }

        Ok(summary)
    }

    async fn run_targets(
        &mut self,
        targets: &[CrawlTarget],
        field_map: &FieldMap,
        summary: &mut RunSummary,
        started: Instant,
    ) -> Result<(), HarvestError> {
        for (position, target) in targets.iter().enumerate() {
            info!(
                "Harvesting '{}' from {} ({}/{})",
                target.name,
                target.url,
                position + 1,
                targets.len()
            );

            let report = match self.run_target(target, field_map).await {
                Ok(outcome) => report_for(target, outcome),
                Err(e) if is_fatal(&e.source) => return Err(e.source),
                Err(e) => {
                    error!(
                        "Target '{}' failed after {} pages: {}",
                        target.name, e.pages, e.source
                    );
                    TargetReport {
                        name: target.name.clone(),
                        url: target.url.clone(),
                        pages: e.pages,
                        rows: e.rows,
                        outcome: TargetOutcome::Failed(e.source.to_string()),
                    }
                }
            };

            info!(
                "Finished '{}': {} pages, {} rows (elapsed {:.1}s)",
                report.name,
                report.pages,
                report.rows,
                started.elapsed().as_secs_f64()
            );
            summary.targets.push(report);

            if position + 1 < targets.len() {
                self.pacer.pause(Pause::BetweenTargets).await;
            }
        }

        Ok(())
    }

    async fn run_target(
        &mut self,
        target: &CrawlTarget,
        field_map: &FieldMap,
    ) -> Result<PaginationOutcome, PaginationError> {
        self.browser
            .navigate(&target.url)
            .await
            .map_err(|e| PaginationError::new(e, 0, 0))?;
        self.pacer.pause(Pause::InitialLoad).await;

        let mut sink = self
            .sinks
            .open(&target.name)
            .map_err(|e| PaginationError::new(e, 0, 0))?;

        Paginator::new(&self.item_locator, &self.next_page_locator, self.max_pages)
            .run(&mut self.browser, field_map, &mut sink, &mut self.pacer)
            .await
    }
}

/// Errors that stop the whole run instead of one target
fn is_fatal(error: &HarvestError) -> bool {
    match error {
        HarvestError::Config(_) | HarvestError::InvalidTransition { .. } => true,
        HarvestError::Browser(e) => e.is_config(),
        _ => false,
    }
}

fn report_for(target: &CrawlTarget, outcome: PaginationOutcome) -> TargetReport {
    let pages = outcome.pages();
    let status = match (outcome.end.is_degraded(), outcome.failure) {
        (true, Some(reason)) => TargetOutcome::Degraded(reason),
        (true, None) => TargetOutcome::Degraded(outcome.end.to_string()),
        (false, _) => TargetOutcome::Completed(outcome.end),
    };

    TargetReport {
        name: target.name.clone(),
        url: target.url.clone(),
        pages,
        rows: outcome.rows,
        outcome: status,
    }
}
