use crate::config::types::{Config, CrawlTarget, TargetsFile};
use crate::config::validation::{validate, validate_targets};
use crate::extract::{FieldMap, Locator};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use listing_harvester::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Fields: {}", config.selectors.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the URL set from the given path
///
/// Targets keep their document order.
pub fn load_targets(path: &Path) -> Result<Vec<CrawlTarget>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_targets(&content)
}

/// Parses and validates the URL set from a TOML string
pub fn parse_targets(content: &str) -> Result<Vec<CrawlTarget>, ConfigError> {
    let file: TargetsFile = toml::from_str(content)?;
    validate_targets(&file.targets)?;
    Ok(file.targets)
}

/// Builds the immutable field map from a validated configuration
pub fn build_field_map(config: &Config) -> Result<FieldMap, ConfigError> {
    let entries = config
        .selectors
        .iter()
        .map(|entry| Ok((entry.name.clone(), Locator::parse(&entry.locator)?)))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let price_field = config
        .extraction
        .price_field
        .as_deref()
        .filter(|name| !name.trim().is_empty());

    Ok(FieldMap::new(
        entries,
        &config.extraction.link_field,
        &config.extraction.link_attribute,
    )?
    .with_price_field(price_field))
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so output files can be traced back to the
/// configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
