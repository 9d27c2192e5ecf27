//! Record and batch types
//!
//! A record always carries one entry per configured field. A field whose
//! locator matched nothing is kept as `FieldValue::Absent` rather than dropped.

use crate::extract::FieldMap;
use std::fmt;

/// Value of one field for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The locator resolved and produced a value
    Found(String),

    /// The locator matched nothing within the item
    Absent,
}

impl FieldValue {
    /// Returns the value text, or None when absent
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Returns true if no value was found
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Applies `f` to a found value, leaving `Absent` untouched
    pub fn map(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Self::Found(value) => Self::Found(f(value)),
            Self::Absent => Self::Absent,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Found)
    }
}

/// Extracted values for one item element, in field map order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates a record with every field of `field_map` set to absent
    pub fn empty(field_map: &FieldMap) -> Self {
        Self {
            fields: field_map
                .iter()
                .map(|f| (f.name.clone(), FieldValue::Absent))
                .collect(),
        }
    }

    /// Sets the value of an existing field
    ///
    /// Unknown names are ignored so the key set cannot drift from the
    /// field map the record was created from.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        }
    }

    /// Looks up a field value by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns the field names in order
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterates over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Renders the record as cells in `schema` order
    ///
    /// Absent values and names missing from the record become empty cells.
    pub fn to_row(&self, schema: &[&str]) -> Vec<String> {
        schema
            .iter()
            .map(|name| {
                self.get(name)
                    .and_then(FieldValue::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            match value {
                FieldValue::Found(v) => write!(f, "{}: {}", name, v)?,
                FieldValue::Absent => write!(f, "{}: -", name)?,
            }
        }
        Ok(())
    }
}

/// Records collected from one page, in page order
pub type Batch = Vec<Record>;
