//! Parsed HTML documents and element handles
//!
//! A fetched page is parsed once into an `HtmlDocument`. Element handles point
//! into that document by node id, so scoped lookups see the element's real
//! ancestors and table markup survives exactly as the page parser built it.

use crate::browser::{BrowserError, BrowserResult};
use crate::extract::Locator;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::rc::Rc;

/// A whole parsed page
#[derive(Clone)]
pub struct HtmlDocument {
    html: Rc<Html>,
}

impl HtmlDocument {
    /// Parses a complete HTML document
    pub fn parse(body: &str) -> Self {
        Self {
            html: Rc::new(Html::parse_document(body)),
        }
    }

    /// Finds every element of the document matching `locator`, in document order
    pub fn select_all(&self, locator: &Locator) -> BrowserResult<Vec<HtmlElement>> {
        let selector = parse_selector(locator)?;

        Ok(self
            .html
            .select(&selector)
            .map(|el| self.handle(el.id()))
            .collect())
    }

    fn handle(&self, id: NodeId) -> HtmlElement {
        HtmlElement {
            document: Rc::clone(&self.html),
            id,
        }
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("nodes", &self.html.tree.nodes().count())
            .finish()
    }
}

/// Handle to one element of an `HtmlDocument`
#[derive(Clone)]
pub struct HtmlElement {
    document: Rc<Html>,
    id: NodeId,
}

impl HtmlElement {
    fn element(&self) -> Option<ElementRef<'_>> {
        self.document.tree.get(self.id).and_then(ElementRef::wrap)
    }

    /// Returns the outer HTML of the element
    pub fn outer_html(&self) -> String {
        self.element().map(|el| el.html()).unwrap_or_default()
    }

    /// Finds descendants matching `locator`, in document order
    ///
    /// The selector is evaluated against the whole document, so combinators
    /// may reach above the element. The element itself is never part of the
    /// result.
    pub fn select_all(&self, locator: &Locator) -> BrowserResult<Vec<HtmlElement>> {
        let selector = parse_selector(locator)?;
        let Some(root) = self.element() else {
            return Ok(Vec::new());
        };

        Ok(root
            .select(&selector)
            .filter(|el| el.id() != self.id)
            .map(|el| HtmlElement {
                document: Rc::clone(&self.document),
                id: el.id(),
            })
            .collect())
    }

    /// Returns the element's text with whitespace runs collapsed
    pub fn text(&self) -> String {
        self.element()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default()
    }

    /// Reads an attribute of the element
    pub fn attr(&self, name: &str) -> Option<String> {
        self.element()
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }
}

impl PartialEq for HtmlElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.document, &other.document) && self.id == other.id
    }
}

impl Eq for HtmlElement {}

impl fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .element()
            .map(|el| el.value().name().to_string())
            .unwrap_or_default();
        f.debug_struct("HtmlElement")
            .field("id", &self.id)
            .field("name", &name)
            .finish()
    }
}

fn parse_selector(locator: &Locator) -> BrowserResult<Selector> {
    Selector::parse(locator.as_str()).map_err(|e| BrowserError::InvalidLocator {
        locator: locator.to_string(),
        message: format!("{:?}", e),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
