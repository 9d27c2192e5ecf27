//! Record extraction from one item element

use crate::browser::{Browser, BrowserError};
use crate::extract::{FieldMap, FieldSpec, FieldValue, Record};
use url::Url;

/// Extracts one record from an item element
///
/// Every field of `field_map` is resolved within `item`'s subtree:
/// - the link field yields the matched element's link attribute, resolved
///   against `base_url` when relative
/// - every other field yields the matched element's text
///
/// A locator with no match, or a lookup the browser cannot complete, leaves
/// the field `Absent`. Only configuration errors (malformed locators) are
/// returned.
pub async fn extract_record<B: Browser + ?Sized>(
    browser: &B,
    item: &B::Element,
    field_map: &FieldMap,
    base_url: Option<&Url>,
) -> Result<Record, BrowserError> {
    let mut record = Record::empty(field_map);

    for field in field_map.iter() {
        let value = match resolve_field(browser, item, field, field_map, base_url).await {
            Ok(value) => value,
            Err(e) if e.is_config() => return Err(e),
            Err(e) => {
                tracing::debug!("Field '{}' lookup failed: {}", field.name, e);
                FieldValue::Absent
            }
        };

        let value = if field_map.price_field() == Some(field.name.as_str()) {
            value.map(|v| normalize_price(&v))
        } else {
            value
        };

        record.set(&field.name, value);
    }

    Ok(record)
}

async fn resolve_field<B: Browser + ?Sized>(
    browser: &B,
    item: &B::Element,
    field: &FieldSpec,
    field_map: &FieldMap,
    base_url: Option<&Url>,
) -> Result<FieldValue, BrowserError> {
    let Some(element) = browser.find_one(&field.locator, Some(item)).await? else {
        return Ok(FieldValue::Absent);
    };

    if field.is_link {
        let target = browser
            .attribute(&element, field_map.link_attribute())
            .await?
            .map(|raw| resolve_link(&raw, base_url));
        Ok(target.into())
    } else {
        Ok(FieldValue::Found(browser.text(&element).await?))
    }
}

/// Resolves a link target against the page URL
///
/// Targets that cannot be resolved are kept verbatim.
fn resolve_link(raw: &str, base_url: Option<&Url>) -> String {
    let raw = raw.trim();
    base_url
        .and_then(|base| base.join(raw).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Rewrites whitespace thousands separators as dots
///
/// `"1 234 567"` becomes `"1.234.567"`. Any run of whitespace (including
/// non-breaking spaces) counts as one separator; leading and trailing
/// whitespace is dropped. No numeric validation is performed.
pub fn normalize_price(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(".")
}
