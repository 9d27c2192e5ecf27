//! Paginator state definitions for tracking traversal of one target
//!
//! The paginator only moves forward: each page index is visited once, in
//! increasing order, and `Done` is terminal.

use crate::HarvestError;
use std::fmt;

/// Why pagination of a target stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationEnd {
    /// No next-page control was present
    LastPage,

    /// The next-page control was present but could not be activated
    ActivationFailed,

    /// The configured page limit was reached
    PageLimit,
}

impl PaginationEnd {
    /// Returns true if pagination stopped before the site ran out of pages
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::ActivationFailed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastPage => "last_page",
            Self::ActivationFailed => "activation_failed",
            Self::PageLimit => "page_limit",
        }
    }
}

impl fmt::Display for PaginationEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the current state of the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginatorState {
    /// Scraping the page with this zero-based index
    Scraping(usize),

    /// Pagination finished
    Done(PaginationEnd),
}

impl PaginatorState {
    /// The state every target starts in
    pub fn initial() -> Self {
        Self::Scraping(0)
    }

    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns the page index being scraped, if any
    pub fn page_index(&self) -> Option<usize> {
        match self {
            Self::Scraping(index) => Some(*index),
            Self::Done(_) => None,
        }
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// `Scraping(n)` may only move to `Scraping(n + 1)` or `Done`.
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Scraping(n), Self::Scraping(m)) => *m == n + 1,
            (Self::Scraping(_), Self::Done(_)) => true,
            (Self::Done(_), _) => false,
        }
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: Self) -> Result<Self, HarvestError> {
        if self.can_transition_to(&next) {
            Ok(next)
        } else {
            Err(HarvestError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Moves to the next page
    pub fn advance(self) -> Result<Self, HarvestError> {
        let next = match self {
            Self::Scraping(n) => Self::Scraping(n + 1),
            Self::Done(_) => self,
        };
        self.transition(next)
    }

    /// Finishes pagination
    pub fn finish(self, end: PaginationEnd) -> Result<Self, HarvestError> {
        self.transition(Self::Done(end))
    }
}

impl fmt::Display for PaginatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scraping(index) => write!(f, "scraping page {}", index + 1),
            Self::Done(end) => write!(f, "done ({})", end),
        }
    }
}
