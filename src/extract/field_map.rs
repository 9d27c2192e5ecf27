//! Field map and locator definitions
//!
//! A `FieldMap` is built once at startup from configuration and shared by
//! reference with every extraction call. It is never mutated afterwards, so
//! every record of a run has the same columns in the same order.

use crate::{ConfigError, ConfigResult};
use scraper::Selector;
use std::collections::HashSet;
use std::fmt;

/// A validated CSS selector expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator(String);

impl Locator {
    /// Parses and validates a CSS selector
    ///
    /// # Returns
    ///
    /// * `Ok(Locator)` - The selector is well formed
    /// * `Err(ConfigError::InvalidLocator)` - The selector cannot be parsed
    pub fn parse(source: &str) -> ConfigResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ConfigError::InvalidLocator {
                locator: source.to_string(),
                message: "locator cannot be empty".to_string(),
            });
        }

        Selector::parse(source).map_err(|e| ConfigError::InvalidLocator {
            locator: source.to_string(),
            message: format!("{:?}", e),
        })?;

        Ok(Self(source.to_string()))
    }

    /// Returns the selector source text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One output column and the locator that fills it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Output column name
    pub name: String,

    /// Locator resolved within each item element
    pub locator: Locator,

    /// Whether this field reads a link target instead of text
    pub is_link: bool,
}

/// Ordered mapping from field name to locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<FieldSpec>,
    link_attribute: String,
    price_field: Option<String>,
}

impl FieldMap {
    /// Builds a field map from ordered `(name, locator)` pairs
    ///
    /// The entry whose name equals `link_field` (if any) is flagged as the
    /// link field. Names must be non-empty and unique.
    pub fn new(
        entries: Vec<(String, Locator)>,
        link_field: &str,
        link_attribute: &str,
    ) -> ConfigResult<Self> {
        if entries.is_empty() {
            return Err(ConfigError::Validation(
                "at least one selector must be configured".to_string(),
            ));
        }

        if link_attribute.trim().is_empty() {
            return Err(ConfigError::Validation(
                "link_attribute cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(entries.len());
        for (name, locator) in entries {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "selector name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate selector name '{}'",
                    name
                )));
            }

            let is_link = name == link_field;
            fields.push(FieldSpec {
                name,
                locator,
                is_link,
            });
        }

        Ok(Self {
            fields,
            link_attribute: link_attribute.trim().to_string(),
            price_field: Some("price".to_string()),
        })
    }

    /// Sets the field that receives thousands-separator normalization
    ///
    /// `None` disables the normalization.
    pub fn with_price_field(mut self, price_field: Option<&str>) -> Self {
        self.price_field = price_field.map(str::to_string);
        self
    }

    /// Iterates over the fields in column order
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Returns the column names in order
    pub fn schema(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the map has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the link field, if one of the fields is flagged
    pub fn link_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.is_link)
    }

    /// Attribute read from the link field's element
    pub fn link_attribute(&self) -> &str {
        &self.link_attribute
    }

    /// Field whose value is price-normalized
    pub fn price_field(&self) -> Option<&str> {
        self.price_field.as_deref()
    }
}
