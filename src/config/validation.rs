use crate::config::types::{Config, CrawlTarget, CrawlerSettings, DelayRange, OutputSettings};
use crate::extract::Locator;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_settings(&config.crawler)?;
    validate_output_settings(&config.output)?;
    validate_selectors(config)?;
    Ok(())
}

/// Validates crawler settings
fn validate_crawler_settings(settings: &CrawlerSettings) -> Result<(), ConfigError> {
    Locator::parse(&settings.item_locator)?;
    Locator::parse(&settings.next_page_locator)?;

    validate_delay_range("page_settle_ms", &settings.page_settle_ms)?;
    validate_delay_range("between_targets_ms", &settings.between_targets_ms)?;

    if settings.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_delay_range(name: &str, range: &DelayRange) -> Result<(), ConfigError> {
    if range.min > range.max {
        return Err(ConfigError::Validation(format!(
            "{} min ({}ms) must not exceed max ({}ms)",
            name, range.min, range.max
        )));
    }
    Ok(())
}

/// Validates output settings
fn validate_output_settings(settings: &OutputSettings) -> Result<(), ConfigError> {
    let extension = settings.extension.trim_start_matches('.');
    if extension.is_empty() {
        return Err(ConfigError::Validation(
            "output extension cannot be empty".to_string(),
        ));
    }

    if extension.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "output extension '{}' cannot contain path separators",
            settings.extension
        )));
    }

    Ok(())
}

/// Validates the selector list (names and locators)
fn validate_selectors(config: &Config) -> Result<(), ConfigError> {
    if config.selectors.is_empty() {
        return Err(ConfigError::Validation(
            "at least one selector must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in &config.selectors {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "selector name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(entry.name.trim()) {
            return Err(ConfigError::Validation(format!(
                "duplicate selector name '{}'",
                entry.name
            )));
        }

        Locator::parse(&entry.locator)?;
    }

    Ok(())
}

/// Validates the URL set
///
/// An empty set is valid; the crawl simply does nothing.
pub fn validate_targets(targets: &[CrawlTarget]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for target in targets {
        validate_resource_name(&target.name)?;

        if !seen.insert(target.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target name '{}'",
                target.name
            )));
        }

        let url = Url::parse(&target.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid target URL '{}': {}", target.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Target URL '{}' must use http or https",
                target.url
            )));
        }
    }

    Ok(())
}

/// Validates that a target name is usable as a file stem
fn validate_resource_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target name cannot be empty".to_string(),
        ));
    }

    if name.contains(['/', '\\', '\0']) || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "target name '{}' cannot contain path separators",
            name
        )));
    }

    Ok(())
}
