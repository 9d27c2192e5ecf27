//! Single-page scraping

use crate::browser::{Browser, BrowserError};
use crate::extract::{extract_record, Batch, FieldMap, Locator};
use tracing::{info, warn};
use url::Url;

/// Scrapes every item on the browser's current page
///
/// Items are located with `item_locator` and extracted in page order. A page
/// without items yields an empty batch. One log line is emitted per record.
///
/// # Returns
///
/// * `Ok(Batch)` - Records of this page, possibly empty
/// * `Err(BrowserError)` - A locator is malformed
pub async fn scrape_page<B: Browser + ?Sized>(
    browser: &B,
    item_locator: &Locator,
    field_map: &FieldMap,
    page_index: usize,
) -> Result<Batch, BrowserError> {
    let base_url = match browser.current_url().await {
        Ok(url) => url.and_then(|u| Url::parse(&u).ok()),
        Err(e) => {
            warn!("Could not read current URL: {}", e);
            None
        }
    };

    let items = match browser.find_all(item_locator, None).await {
        Ok(items) => items,
        Err(e) if e.is_config() => return Err(e),
        Err(e) => {
            warn!("Item lookup failed on page {}: {}", page_index + 1, e);
            Vec::new()
        }
    };

    if items.is_empty() {
        info!("No items found on page {}", page_index + 1);
        return Ok(Batch::new());
    }

    let mut batch = Batch::with_capacity(items.len());
    for item in &items {
        let record = extract_record(browser, item, field_map, base_url.as_ref()).await?;
        info!("{}", record);
        batch.push(record);
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::FakeBrowser;
    use crate::extract::FieldValue;

    fn field_map() -> FieldMap {
        FieldMap::new(
            vec![
                ("title".to_string(), Locator::parse(".t").unwrap()),
                ("price".to_string(), Locator::parse(".p").unwrap()),
                ("url".to_string(), Locator::parse("a.link").unwrap()),
            ],
            "url",
            "href",
        )
        .unwrap()
    }

    fn items() -> Locator {
        Locator::parse(".item").unwrap()
    }

    #[tokio::test]
    async fn test_scrape_preserves_page_order() {
        let browser = FakeBrowser::single_page(
            "http://x/list",
            r#"<div class="item"><span class="t">One</span><a class="link" href="/1">a</a></div>
               <div class="item"><span class="t">Two</span><span class="p">2 000</span></div>
               <div class="item"><span class="t">Three</span></div>"#,
        )
        .await;

        let batch = scrape_page(&browser, &items(), &field_map(), 0).await.unwrap();

        let titles: Vec<_> = batch
            .iter()
            .map(|r| r.get("title").and_then(FieldValue::as_str).unwrap())
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(
            batch[0].get("url"),
            Some(&FieldValue::Found("http://x/1".into()))
        );
        assert_eq!(
            batch[1].get("price"),
            Some(&FieldValue::Found("2.000".into()))
        );
    }

    #[tokio::test]
    async fn test_scrape_empty_page() {
        let browser = FakeBrowser::single_page("http://x/list", "<p>nothing here</p>").await;
        let batch = scrape_page(&browser, &items(), &field_map(), 3).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_every_record_has_the_same_keys() {
        let browser = FakeBrowser::single_page(
            "http://x/list",
            r#"<div class="item"><span class="p">1</span></div>
               <div class="item"></div>
               <div class="item"><a class="link" href="/z">z</a></div>"#,
        )
        .await;

        let batch = scrape_page(&browser, &items(), &field_map(), 0).await.unwrap();
        assert_eq!(batch.len(), 3);
        for record in &batch {
            assert_eq!(record.keys(), vec!["title", "price", "url"]);
        }
    }
}
