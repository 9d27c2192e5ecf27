//! In-memory fakes for crawler tests

use crate::browser::{Browser, BrowserError, BrowserResult, HtmlDocument, HtmlElement};
use crate::crawler::pacing::{Pacer, Pause};
use crate::extract::{Locator, Record};
use crate::output::{OutputError, OutputResult, Sink, SinkFactory};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use url::Url;

/// Browser over a fixed map of URL to HTML body
///
/// Activation follows the control's `href` relative to the current URL.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    pages: HashMap<String, String>,
    current: Option<String>,
    document: Option<HtmlDocument>,
    pub fail_activation: bool,
    /// Makes every lookup fail as if its locator were malformed
    pub reject_locators: bool,
    /// Makes every lookup fail as if the session had died
    pub fail_lookups: bool,
    pub navigations: Vec<String>,
    pub activations: usize,
    pub released: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            format!("<html><body>{}</body></html>", body),
        );
        self
    }

    /// A browser already positioned on a single page
    pub async fn single_page(url: &str, body: &str) -> Self {
        let mut browser = Self::new().with_page(url, body);
        browser.navigate(url).await.unwrap();
        browser
    }

    fn document(&self) -> BrowserResult<&HtmlDocument> {
        self.document.as_ref().ok_or(BrowserError::NoPage)
    }
}

#[async_trait(?Send)]
impl Browser for FakeBrowser {
    type Element = HtmlElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.navigations.push(url.to_string());
        let Some(body) = self.pages.get(url) else {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        };
        self.document = Some(HtmlDocument::parse(body));
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(self.current.clone())
    }

    async fn find_all(
        &self,
        locator: &Locator,
        scope: Option<&HtmlElement>,
    ) -> BrowserResult<Vec<HtmlElement>> {
        if self.reject_locators {
            return Err(BrowserError::InvalidLocator {
                locator: locator.to_string(),
                message: "unexpected token".to_string(),
            });
        }
        if self.fail_lookups {
            return Err(BrowserError::Lookup(format!(
                "'{}': session closed",
                locator
            )));
        }
        match scope {
            Some(element) => element.select_all(locator),
            None => self.document()?.select_all(locator),
        }
    }

    async fn text(&self, element: &HtmlElement) -> BrowserResult<String> {
        Ok(element.text())
    }

    async fn attribute(&self, element: &HtmlElement, name: &str) -> BrowserResult<Option<String>> {
        Ok(element.attr(name))
    }

    async fn activate(&mut self, element: &HtmlElement) -> BrowserResult<()> {
        self.activations += 1;
        if self.fail_activation {
            return Err(BrowserError::Activation(
                "stale element reference".to_string(),
            ));
        }

        let href = element
            .attr("href")
            .ok_or_else(|| BrowserError::Activation("no href".to_string()))?;
        let current = self.current.clone().ok_or(BrowserError::NoPage)?;
        let target = Url::parse(&current)
            .and_then(|base| base.join(&href))
            .map_err(|e| BrowserError::Activation(e.to_string()))?;

        self.navigate(target.as_str())
            .await
            .map_err(|e| BrowserError::Activation(e.to_string()))
    }

    async fn release(&mut self) -> BrowserResult<()> {
        self.released = true;
        Ok(())
    }
}

/// Pacer that records pauses without sleeping
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pub pauses: Vec<Pause>,
}

#[async_trait(?Send)]
impl Pacer for RecordingPacer {
    async fn pause(&mut self, pause: Pause) {
        self.pauses.push(pause);
    }
}

type Store = Rc<RefCell<BTreeMap<String, Vec<Vec<String>>>>>;

/// Sink factory keeping every resource's rows in memory
///
/// The first stored row of a resource is its header.
#[derive(Debug, Clone, Default)]
pub struct MemorySinkFactory {
    store: Store,
    /// Successful appends allowed per resource before writes start failing
    failing: HashMap<String, usize>,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes appends to `name` fail
    pub fn failing(self, name: &str) -> Self {
        self.failing_after(name, 0)
    }

    /// Lets `successes` appends to `name` through, then fails the rest
    pub fn failing_after(mut self, name: &str, successes: usize) -> Self {
        self.failing.insert(name.to_string(), successes);
        self
    }

    /// Header of a resource, if anything was written
    pub fn header(&self, name: &str) -> Option<Vec<String>> {
        self.store
            .borrow()
            .get(name)
            .and_then(|rows| rows.first().cloned())
    }

    /// Data rows of a resource
    pub fn rows(&self, name: &str) -> Vec<Vec<String>> {
        self.store
            .borrow()
            .get(name)
            .map(|rows| rows.iter().skip(1).cloned().collect())
            .unwrap_or_default()
    }

    /// Names of resources that received rows
    pub fn resources(&self) -> Vec<String> {
        self.store.borrow().keys().cloned().collect()
    }
}

impl SinkFactory for MemorySinkFactory {
    type Sink = MemorySink;

    fn open(&self, resource_name: &str) -> OutputResult<MemorySink> {
        Ok(MemorySink {
            name: resource_name.to_string(),
            store: Rc::clone(&self.store),
            remaining: self.failing.get(resource_name).copied(),
        })
    }
}

/// Sink writing into a `MemorySinkFactory`
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    store: Store,
    remaining: Option<usize>,
}

impl Sink for MemorySink {
    fn resource_name(&self) -> &str {
        &self.name
    }

    fn append(&mut self, batch: &[Record], schema: &[&str]) -> OutputResult<usize> {
        match self.remaining {
            Some(0) => return Err(OutputError::Write("disk full".to_string())),
            Some(n) => self.remaining = Some(n - 1),
            None => {}
        }
        if batch.is_empty() {
            return Ok(0);
        }

        let mut store = self.store.borrow_mut();
        let rows = store.entry(self.name.clone()).or_default();
        if rows.is_empty() {
            rows.push(schema.iter().map(|s| s.to_string()).collect());
        }
        rows.extend(batch.iter().map(|record| record.to_row(schema)));

        Ok(batch.len())
    }
}
