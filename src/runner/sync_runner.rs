use serde_json::Value;
use std::error::Error;
use std::io::Write;
use tracing::debug;

use super::{write_summary, SummaryOptions};
use crate::aggregator::{aggregate, TracingSink};
use crate::dto::ReceiptRecord;
use crate::error::StoreError;
use crate::report::{render_documents, Banner};
use crate::stores::ReceiptStore;

/// Reads every receipt from the store, aggregates category totals and writes
/// the summary to the provided writer.
///
/// "No data" and "no valid data" are written as banners, not returned as
/// errors.
///
/// # Errors
/// Returns an error if:
/// * The store cannot be read
/// * Writing to the output fails
pub fn run<S, W>(store: &S, options: &SummaryOptions, writer: W) -> Result<(), Box<dyn Error>>
where
    S: ReceiptStore + ?Sized,
    W: Write,
{
    let records: Vec<ReceiptRecord> = store
        .find_all()?
        .into_iter()
        .map(ReceiptRecord::from)
        .collect();
    debug!(records = records.len(), "aggregating receipts");

    let outcome = aggregate(&records, &mut TracingSink);
    write_summary(&outcome, options, writer)?;
    Ok(())
}

/// Writes every stored receipt under a numbered header.
pub fn list<S, W>(store: &S, writer: W) -> Result<(), Box<dyn Error>>
where
    S: ReceiptStore + ?Sized,
    W: Write,
{
    let documents = store.find_all()?;
    render_documents(&documents, writer)?;
    Ok(())
}

/// Parses `payload` as a receipt document, stores it and writes a success
/// banner. Returns the document's `_id`.
///
/// # Errors
/// Returns an error if the payload is not a JSON object or the store rejects
/// the write.
pub fn insert<S, W>(store: &mut S, payload: &str, mut writer: W) -> Result<Value, Box<dyn Error>>
where
    S: ReceiptStore + ?Sized,
    W: Write,
{
    let value: Value = serde_json::from_str(payload).map_err(|source| StoreError::Decode {
        line: source.line(),
        source,
    })?;
    let Value::Object(document) = value else {
        return Err(StoreError::NotADocument.into());
    };
    let id = store.insert_one(document)?;
    writeln!(
        writer,
        "{}",
        Banner::Success(format!("Data successfully saved (id {}).", id))
    )?;
    Ok(id)
}
