//! Field extraction for listing items
//!
//! This module handles:
//! - The ordered field-to-locator mapping built from configuration
//! - Per-item records whose keys always mirror that mapping
//! - Resolving each field against one item element

mod extractor;
mod field_map;
mod record;

pub use extractor::{extract_record, normalize_price};
pub use field_map::{FieldMap, FieldSpec, Locator};
pub use record::{Batch, FieldValue, Record};
