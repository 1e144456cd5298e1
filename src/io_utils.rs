//! JSON-lines and CSV utilities.
//!
//! Documents are stored one compact JSON object per line. Summary tables are
//! written as CSV.

use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::dto::Document;
use crate::error::StoreError;

/// Decodes one JSON-lines line. Blank lines yield `None`.
/// `line` is the 1-based line number used in errors.
pub fn decode_line(line: usize, text: &str) -> Result<Option<Document>, StoreError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(text).map_err(|source| StoreError::Decode { line, source })?;
    match value {
        Value::Object(document) => Ok(Some(document)),
        _ => Err(StoreError::NotAnObject { line }),
    }
}

/// Creates an iterator over the documents of a JSON-lines file.
pub fn read_jsonl<P>(path: P) -> Result<impl Iterator<Item = Result<Document, StoreError>>, StoreError>
where
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    Ok(reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(text) => decode_line(index + 1, &text).transpose(),
            Err(err) => Some(Err(err.into())),
        }))
}

/// Appends a document as a single line, creating the file and its parent
/// directories as needed.
pub fn append_jsonl<P>(path: P, document: &Document) -> Result<(), StoreError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut line = serde_json::to_vec(document).map_err(std::io::Error::from)?;
    line.push(b'\n');
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(&line)?;
    Ok(())
}

/// Writes an iterator of records to a CSV writer.
/// Each record must implement Serialize.
pub fn write_csv<T, W>(writer: W, records: impl Iterator<Item = T>) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
