use serde_json::Value;

use super::{assign_id, ReceiptStore};
use crate::dto::Document;
use crate::error::StoreError;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: Vec<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Builds a store by inserting each document in turn.
    /// Fails on the first document that cannot be inserted.
    pub fn from_documents<I>(documents: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut store = MemoryStore::new();
        for document in documents {
            store.insert_one(document)?;
        }
        Ok(store)
    }
}

impl ReceiptStore for MemoryStore {
    fn insert_one(&mut self, mut document: Document) -> Result<Value, StoreError> {
        let id = assign_id(&mut document, &self.documents)?;
        self.documents.push(document);
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.clone())
    }
}
