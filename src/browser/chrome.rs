//! Chrome/Chromium session over the DevTools protocol
//!
//! Launches a browser with automation markers suppressed and drives a single
//! tab. Element handles are live CDP nodes, so they go stale once the page
//! navigates away.

use crate::browser::{Browser, BrowserError, BrowserResult};
use crate::config::BrowserSettings;
use crate::extract::Locator;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser as CdpBrowser, BrowserConfig, Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Hides `navigator.webdriver` from page scripts.
const HIDE_WEBDRIVER_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined
    })
"#;

/// A launched Chrome instance with one active tab
pub struct ChromeBrowser {
    browser: CdpBrowser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeBrowser {
    /// Launches Chrome with the configured options
    pub async fn launch(settings: &BrowserSettings) -> BrowserResult<Self> {
        info!("Launching browser (headless={})", settings.headless);

        let mut builder = BrowserConfig::builder();
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(ref path) = settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        for arg in &settings.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
            HIDE_WEBDRIVER_SCRIPT,
        ))
        .await
        .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

#[async_trait(?Send)]
impl Browser for ChromeBrowser {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        self.page
            .url()
            .await
            .map_err(|e| BrowserError::Lookup(e.to_string()))
    }

    async fn find_all(
        &self,
        locator: &Locator,
        scope: Option<&Element>,
    ) -> BrowserResult<Vec<Element>> {
        // querySelectorAll reports zero matches as an empty list
        let result = match scope {
            Some(element) => element.find_elements(locator.as_str()).await,
            None => self.page.find_elements(locator.as_str()).await,
        };

        result.map_err(|e| {
            debug!("Lookup for '{}' failed: {}", locator, e);
            BrowserError::Lookup(format!("'{}': {}", locator, e))
        })
    }

    async fn text(&self, element: &Element) -> BrowserResult<String> {
        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::Lookup(e.to_string()))?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    async fn attribute(&self, element: &Element, name: &str) -> BrowserResult<Option<String>> {
        element
            .attribute(name)
            .await
            .map_err(|e| BrowserError::Lookup(e.to_string()))
    }

    async fn activate(&mut self, element: &Element) -> BrowserResult<()> {
        element
            .click()
            .await
            .map_err(|e| BrowserError::Activation(e.to_string()))?;
        Ok(())
    }

    async fn release(&mut self) -> BrowserResult<()> {
        info!("Closing browser");
        if let Err(e) = self.browser.close().await {
            warn!("Browser close returned error: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit returned error: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}
