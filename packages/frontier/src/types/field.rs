//! Field vocabulary and parse-result records.
//!
//! Callers ask a strategy for a set of [`Field`]s; a successful parse
//! returns a [`FieldRecord`] that contains a value for every requested
//! field, with [`FieldValue::Empty`] standing in for anything the page did
//! not yield. Callers may rely on key presence without existence checks.

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known extraction fields.
///
/// A closed vocabulary; site-specific characteristics without a
/// predefined structure go into the [`Field::Characteristics`] bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Canonical URL of the entity on the site.
    Url,
    /// Display name / title.
    Name,
    /// Article number / SKU.
    Sku,
    /// Price as a decimal number.
    Price,
    /// Stock count.
    Stock,
    /// Long description text.
    Description,
    /// Image URLs.
    Images,
    /// Category name.
    Category,
    /// Breadcrumb trail.
    Breadcrumbs,
    /// Free-form site-specific attributes.
    Characteristics,
    /// Pagination links discovered on a category page.
    Pages,
    /// Subcategory links discovered on a category page.
    Subcategories,
    /// Product links discovered on a category page.
    Products,
    /// When the response was received.
    ParsedAt,
    /// URL the response was fetched from.
    ParsedUrl,
    /// HTTP status of the response.
    ParsedStatus,
    /// Proxy used for the request, if any.
    ParsedProxy,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Url => "url",
            Field::Name => "name",
            Field::Sku => "sku",
            Field::Price => "price",
            Field::Stock => "stock",
            Field::Description => "description",
            Field::Images => "images",
            Field::Category => "category",
            Field::Breadcrumbs => "breadcrumbs",
            Field::Characteristics => "characteristics",
            Field::Pages => "pages",
            Field::Subcategories => "subcategories",
            Field::Products => "products",
            Field::ParsedAt => "parsed_at",
            Field::ParsedUrl => "parsed_url",
            Field::ParsedStatus => "parsed_status",
            Field::ParsedProxy => "parsed_proxy",
        };
        f.write_str(s)
    }
}

/// A requested set of fields.
///
/// Insertion-ordered so that records iterate in the order the caller
/// asked for.
pub type FieldSet = IndexSet<Field>;

/// Build a [`FieldSet`] from a list of fields.
pub fn field_set(fields: impl IntoIterator<Item = Field>) -> FieldSet {
    fields.into_iter().collect()
}

/// Value of a single extracted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Requested but not found on the page (the "null" of the contract).
    Empty,
    /// Free text.
    Text(String),
    /// Decimal number (prices).
    Number(f64),
    /// Whole number (stock counts).
    Integer(i64),
    /// HTTP status code.
    Status(u16),
    /// Timestamp.
    Timestamp(DateTime<Utc>),
    /// Ordered list of strings (image URLs, discovered link ids).
    List(Vec<String>),
    /// Free-form key/value attributes.
    Attrs(IndexMap<String, String>),
}

impl FieldValue {
    /// True for the null value.
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The list content, if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Extraction result for one entity.
///
/// Always holds exactly the keys of the requested [`FieldSet`]: construct
/// with [`FieldRecord::for_fields`] and fill in what the page yielded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldRecord {
    values: IndexMap<Field, FieldValue>,
}

impl FieldRecord {
    /// Create a record pre-filled with [`FieldValue::Empty`] for every
    /// requested field.
    pub fn for_fields(fields: &FieldSet) -> Self {
        Self {
            values: fields
                .iter()
                .map(|field| (*field, FieldValue::Empty))
                .collect(),
        }
    }

    /// Set a field value, builder style.
    pub fn with(mut self, field: Field, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Get a field value.
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Iterate over `(field, value)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// The fields present in this record.
    pub fn fields(&self) -> FieldSet {
        self.values.keys().copied().collect()
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the record holds no fields at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pagination link ids discovered on a category page.
    pub fn pages(&self) -> &[String] {
        self.get(Field::Pages)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
    }

    /// Product link ids discovered on a category page.
    pub fn products(&self) -> &[String] {
        self.get(Field::Products)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_fields_prefills_every_key() {
        let fields = field_set([Field::Name, Field::Price, Field::Sku]);
        let record = FieldRecord::for_fields(&fields);

        assert_eq!(record.len(), 3);
        for (_, value) in record.iter() {
            assert!(value.is_empty());
        }
    }

    #[test]
    fn test_field_completeness_after_partial_fill() {
        let fields = field_set([Field::Name, Field::Price]);
        let record = FieldRecord::for_fields(&fields)
            .with(Field::Name, FieldValue::Text("Hammer".into()));

        // Keys equal the requested set exactly, even with price unfilled.
        assert_eq!(record.fields(), fields);
        assert_eq!(record.get(Field::Name).unwrap().as_text(), Some("Hammer"));
        assert!(record.get(Field::Price).unwrap().is_empty());
    }

    #[test]
    fn test_discovery_helpers() {
        let record = FieldRecord::default()
            .with(
                Field::Pages,
                FieldValue::List(vec!["/a?page=2".into(), "/a?page=3".into()]),
            )
            .with(Field::Products, FieldValue::List(vec!["/p1".into()]));

        assert_eq!(record.pages(), ["/a?page=2", "/a?page=3"]);
        assert_eq!(record.products(), ["/p1"]);

        let bare = FieldRecord::default();
        assert!(bare.pages().is_empty());
        assert!(bare.products().is_empty());
    }
}
