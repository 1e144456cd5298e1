//! Errors for the receipt aggregation pipeline.
//!
//! Two families:
//! - [`AggregateError`]: reported conditions of an aggregation run (no data,
//!   no usable data). These are outcomes the caller renders, not crashes.
//! - [`StoreError`]: I/O and decoding failures of the document store.
//!
//! Malformed line items are never errors; they are skipped and, for bad
//! prices, reported as warnings.

use std::io;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum AggregateError {
    #[error("no receipt records were supplied")]
    EmptyInput,
    #[error("receipt records were supplied but no line item had a valid category and price")]
    NoValidCategories,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: invalid JSON document: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: document is not a JSON object")]
    NotAnObject { line: usize },
    #[error("receipt payload is not a JSON object")]
    NotADocument,
    #[error("a document with _id {id} already exists")]
    DuplicateId { id: serde_json::Value },
    #[error("no numeric _id left to assign")]
    IdExhausted,
}
