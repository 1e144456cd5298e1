//! Document storage for receipts. Provides:
//! - An in-memory collection ([`MemoryStore`])
//! - A JSON-lines file collection ([`JsonlStore`])
//!
//! Both support exactly two operations: insert one document and read the
//! whole collection back in insertion order.

mod jsonl;
mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::dto::Document;
use crate::error::StoreError;

pub const ID_FIELD: &str = "_id";

pub trait ReceiptStore {
    /// Inserts a document and returns its `_id`.
    /// A document without `_id` is assigned the next sequence number; one
    /// whose `_id` is already taken is rejected.
    fn insert_one(&mut self, document: Document) -> Result<Value, StoreError>;

    /// Returns every document in insertion order.
    fn find_all(&self) -> Result<Vec<Document>, StoreError>;
}

/// Ensures `document` has an `_id` unique within `existing`, returning it.
/// Generated ids are one past the larger of the collection size and the
/// highest numeric id already present.
fn assign_id(document: &mut Document, existing: &[Document]) -> Result<Value, StoreError> {
    if let Some(id) = document.get(ID_FIELD) {
        if existing.iter().any(|doc| doc.get(ID_FIELD) == Some(id)) {
            return Err(StoreError::DuplicateId { id: id.clone() });
        }
        return Ok(id.clone());
    }
    let highest = existing
        .iter()
        .filter_map(|doc| doc.get(ID_FIELD).and_then(Value::as_u64))
        .max()
        .unwrap_or(0);
    let next = highest
        .max(existing.len() as u64)
        .checked_add(1)
        .ok_or(StoreError::IdExhausted)?;
    let id = Value::from(next);
    document.insert(ID_FIELD.to_owned(), id.clone());
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(document) => document,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_assign_id_to_empty_collection() {
        let mut document = doc(json!({"store": "A"}));
        assert_eq!(assign_id(&mut document, &[]).unwrap(), json!(1));
        assert_eq!(document[ID_FIELD], json!(1));
    }

    #[test]
    fn test_existing_id_is_kept() {
        let mut document = doc(json!({"_id": "receipt-9"}));
        assert_eq!(assign_id(&mut document, &[]).unwrap(), json!("receipt-9"));
    }

    #[test]
    fn test_generated_id_skips_past_explicit_ids() {
        let existing = vec![doc(json!({"_id": 10})), doc(json!({"_id": "x"}))];
        let mut document = doc(json!({}));
        assert_eq!(assign_id(&mut document, &existing).unwrap(), json!(11));

        let existing = vec![doc(json!({"_id": "a"})), doc(json!({"_id": "b"}))];
        let mut document = doc(json!({}));
        assert_eq!(assign_id(&mut document, &existing).unwrap(), json!(3));
    }

    #[test]
    fn test_generated_id_past_u64_max_fails() {
        let existing = vec![doc(json!({"_id": u64::MAX}))];
        let mut document = doc(json!({"store": "A"}));
        assert!(matches!(
            assign_id(&mut document, &existing),
            Err(StoreError::IdExhausted)
        ));
        assert_eq!(document.get(ID_FIELD), None);
    }

    #[test]
    fn test_duplicate_explicit_id_is_rejected() {
        let existing = vec![doc(json!({"_id": 1})), doc(json!({"_id": "receipt-9"}))];

        let mut document = doc(json!({"_id": "receipt-9"}));
        assert!(matches!(
            assign_id(&mut document, &existing),
            Err(StoreError::DuplicateId { id }) if id == json!("receipt-9")
        ));

        // Same number, different JSON type: not a duplicate
        let mut document = doc(json!({"_id": "1"}));
        assert_eq!(assign_id(&mut document, &existing).unwrap(), json!("1"));
    }
}
