//! HTTP-backed browser
//!
//! Treats each fetched HTML document as the current page. There is no script
//! execution: activating a control follows its `href` relative to the current
//! page URL, and a control without one cannot be activated.

use crate::browser::html::{HtmlDocument, HtmlElement};
use crate::browser::{Browser, BrowserError, BrowserResult};
use crate::config::BrowserSettings;
use crate::extract::Locator;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A page fetched over HTTP
#[derive(Debug, Clone)]
struct LoadedPage {
    url: Url,
    document: HtmlDocument,
}

/// Browser session that fetches pages with `reqwest`
pub struct HttpBrowser {
    client: Client,
    page: Option<LoadedPage>,
}

impl HttpBrowser {
    /// Builds an HTTP client from the browser settings
    pub fn new(settings: &BrowserSettings) -> BrowserResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self::with_client(client))
    }

    /// Uses an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client, page: None }
    }

    fn page(&self) -> BrowserResult<&LoadedPage> {
        self.page.as_ref().ok_or(BrowserError::NoPage)
    }
}

#[async_trait(?Send)]
impl Browser for HttpBrowser {
    type Element = HtmlElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let navigation_error = |message: String| BrowserError::Navigation {
            url: url.to_string(),
            message,
        };

        let target = Url::parse(url).map_err(|e| navigation_error(e.to_string()))?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| navigation_error(e.to_string()))?;

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        tracing::debug!("Loaded {} ({} bytes)", final_url, body.len());
        self.page = Some(LoadedPage {
            url: final_url,
            document: HtmlDocument::parse(&body),
        });

        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(self.page.as_ref().map(|p| p.url.to_string()))
    }

    async fn find_all(
        &self,
        locator: &Locator,
        scope: Option<&HtmlElement>,
    ) -> BrowserResult<Vec<HtmlElement>> {
        match scope {
            Some(element) => element.select_all(locator),
            None => self.page()?.document.select_all(locator),
        }
    }

    async fn text(&self, element: &HtmlElement) -> BrowserResult<String> {
        Ok(element.text())
    }

    async fn attribute(&self, element: &HtmlElement, name: &str) -> BrowserResult<Option<String>> {
        Ok(element.attr(name))
    }

    async fn activate(&mut self, element: &HtmlElement) -> BrowserResult<()> {
        let href = element
            .attr("href")
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| BrowserError::Activation("control has no href".to_string()))?;

        let target = self
            .page()?
            .url
            .join(href.trim())
            .map_err(|e| BrowserError::Activation(format!("bad href '{}': {}", href, e)))?;

        self.navigate(target.as_str())
            .await
            .map_err(|e| BrowserError::Activation(e.to_string()))
    }

    async fn release(&mut self) -> BrowserResult<()> {
        self.page = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_without_page() {
        let browser = HttpBrowser::with_client(Client::new());
        let result = browser
            .find_all(&Locator::parse(".item").unwrap(), None)
            .await;
        assert!(matches!(result, Err(BrowserError::NoPage)));
        assert_eq!(browser.current_url().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_activate_without_href_fails() {
        let mut browser = HttpBrowser::with_client(Client::new());
        let button = HtmlDocument::parse("<button>Next</button>")
            .select_all(&Locator::parse("button").unwrap())
            .unwrap()
            .remove(0);
        let result = browser.activate(&button).await;
        assert!(matches!(result, Err(BrowserError::Activation(_))));
    }

    #[tokio::test]
    async fn test_navigate_invalid_url() {
        let mut browser = HttpBrowser::with_client(Client::new());
        let result = browser.navigate("not a url").await;
        assert!(matches!(result, Err(BrowserError::Navigation { .. })));
    }
}
