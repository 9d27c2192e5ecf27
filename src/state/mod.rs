//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `PaginatorState`: the forward-only `Scraping(n)` / `Done` machine driven per target
//! - `PaginationEnd`: why a target's pagination stopped

mod paginator_state;

pub use paginator_state::{PaginationEnd, PaginatorState};
