use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{assign_id, ReceiptStore};
use crate::dto::Document;
use crate::error::StoreError;
use crate::io_utils::{append_jsonl, read_jsonl};

/// A collection persisted as a JSON-lines file. A missing file is an empty
/// collection; the file is created on first insert.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReceiptStore for JsonlStore {
    fn insert_one(&mut self, mut document: Document) -> Result<Value, StoreError> {
        let existing = self.find_all()?;
        let id = assign_id(&mut document, &existing)?;
        append_jsonl(&self.path, &document)?;
        debug!(path = %self.path.display(), id = %id, "inserted document");
        Ok(id)
    }

    fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let documents = match read_jsonl(&self.path) {
            Ok(documents) => documents.collect::<Result<Vec<_>, _>>()?,
            Err(StoreError::Io(err)) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err),
        };
        debug!(path = %self.path.display(), count = documents.len(), "read documents");
        Ok(documents)
    }
}
