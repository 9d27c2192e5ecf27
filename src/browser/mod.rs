//! Browser capability consumed by the scraper
//!
//! The crawl core never talks to a concrete browser. It drives a `Browser`
//! session passed in explicitly, so the same paginator runs against:
//! - `ChromeBrowser`: a real Chrome/Chromium session over CDP (`browser` feature)
//! - `HttpBrowser`: fetched HTML documents, where activating a control follows its link
//! - test fakes

#[cfg(feature = "browser")]
mod chrome;
mod html;
mod http;

#[cfg(feature = "browser")]
pub use chrome::ChromeBrowser;
pub use html::{HtmlDocument, HtmlElement};
pub use http::HttpBrowser;

use crate::extract::Locator;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Invalid locator '{locator}': {message}")]
    InvalidLocator { locator: String, message: String },

    #[error("Element lookup failed: {0}")]
    Lookup(String),

    #[error("Failed to activate element: {0}")]
    Activation(String),

    #[error("No page is loaded")]
    NoPage,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl BrowserError {
    /// Returns true for errors caused by configuration rather than page state
    ///
    /// These abort the run; every other lookup error degrades locally.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidLocator { .. })
    }
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A single browser session positioned on one page at a time
///
/// `scope` arguments restrict a lookup to the subtree of an element;
/// `None` searches the whole current page.
#[async_trait(?Send)]
pub trait Browser {
    /// Handle to an element of the current page
    type Element;

    /// Loads `url` as the current page
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Returns the URL of the current page, if one is loaded
    async fn current_url(&self) -> BrowserResult<Option<String>>;

    /// Finds every element matching `locator`, in document order
    async fn find_all(
        &self,
        locator: &Locator,
        scope: Option<&Self::Element>,
    ) -> BrowserResult<Vec<Self::Element>>;

    /// Finds the first element matching `locator`
    ///
    /// Zero matches is `Ok(None)`, not an error.
    async fn find_one(
        &self,
        locator: &Locator,
        scope: Option<&Self::Element>,
    ) -> BrowserResult<Option<Self::Element>> {
        Ok(self.find_all(locator, scope).await?.into_iter().next())
    }

    /// Reads the rendered text of an element
    async fn text(&self, element: &Self::Element) -> BrowserResult<String>;

    /// Reads an attribute of an element
    async fn attribute(&self, element: &Self::Element, name: &str)
        -> BrowserResult<Option<String>>;

    /// Performs a click-equivalent action on an element
    async fn activate(&mut self, element: &Self::Element) -> BrowserResult<()>;

    /// Tears down the session
    async fn release(&mut self) -> BrowserResult<()>;
}
