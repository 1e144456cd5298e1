//! Tagged views over schema-less receipt documents.
//!
//! Documents come out of the store as arbitrary JSON. Rather than failing
//! deserialization on an unexpected shape, every field that the aggregator
//! reads is classified into present-and-usable, present-but-wrong-type, or
//! absent. Conversion from a [`Value`] is therefore infallible.

use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// A stored receipt document.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CategoryField {
    Text(String),
    /// Present but not a string.
    Invalid(Value),
    #[default]
    Absent,
}

impl From<Option<Value>> for CategoryField {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => CategoryField::Absent,
            Some(Value::String(text)) => CategoryField::Text(text),
            Some(other) => CategoryField::Invalid(other),
        }
    }
}

impl CategoryField {
    /// The category label, if it is text that is non-empty after trimming.
    /// The label itself is returned as stored.
    pub fn label(&self) -> Option<&str> {
        match self {
            CategoryField::Text(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PriceField {
    Number(Number),
    Text(String),
    /// Present but neither a number nor a string (bool, array, object).
    Invalid(Value),
    #[default]
    Absent,
}

impl From<Option<Value>> for PriceField {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => PriceField::Absent,
            Some(Value::Number(number)) => PriceField::Number(number),
            Some(Value::String(text)) => PriceField::Text(text),
            Some(other) => PriceField::Invalid(other),
        }
    }
}

impl PriceField {
    /// Missing prices are skipped without a warning. Whitespace-only text is
    /// not missing: it is present and fails coercion.
    pub fn is_missing(&self) -> bool {
        match self {
            PriceField::Absent => true,
            PriceField::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// The raw value as it appeared in the document, for warnings.
    pub fn to_value(&self) -> Value {
        match self {
            PriceField::Number(number) => Value::Number(number.clone()),
            PriceField::Text(text) => Value::String(text.clone()),
            PriceField::Invalid(value) => value.clone(),
            PriceField::Absent => Value::Null,
        }
    }
}

/// One purchased item. An entry of `items` that is not a JSON object becomes
/// a line item with both fields absent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct LineItem {
    pub category: CategoryField,
    pub total_price: PriceField,
}

impl From<Value> for LineItem {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => LineItem {
                category: fields.remove("category").into(),
                total_price: fields.remove("total_price").into(),
            },
            _ => LineItem::default(),
        }
    }
}

/// A receipt as seen by the aggregator. `items` is `None` when the field is
/// missing, null, or not an array.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct ReceiptRecord {
    pub items: Option<Vec<LineItem>>,
}

impl ReceiptRecord {
    pub fn items(&self) -> &[LineItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

impl From<Document> for ReceiptRecord {
    fn from(mut document: Document) -> Self {
        let items = match document.remove("items") {
            Some(Value::Array(entries)) => Some(entries.into_iter().map(LineItem::from).collect()),
            _ => None,
        };
        ReceiptRecord { items }
    }
}

impl From<Value> for ReceiptRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(document) => document.into(),
            _ => ReceiptRecord::default(),
        }
    }
}
