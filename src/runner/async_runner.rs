use std::error::Error;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::debug;

use super::{write_summary, SummaryOptions};
use crate::aggregator::{Aggregation, Aggregator, TracingSink};
use crate::dto::ReceiptRecord;
use crate::error::{AggregateError, StoreError};
use crate::io_utils::decode_line;

const BUFFER_SIZE: usize = 1024;

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Aggregates a JSON-lines receipt file asynchronously and writes the summary
/// to the provided writer. Spawns two tasks:
/// * Reader - streams documents from the input file, decodes them and sends the records to the processor via channel.
/// * Processor - receives records from the channel and aggregates them until the channel is closed.
///
/// A missing input file is an empty collection.
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read
/// * A line is not a JSON object
/// * Writing to the output fails
pub async fn run<P, W>(input_path: P, options: &SummaryOptions, writer: W) -> Result<()>
where
    P: AsRef<Path>,
    W: Write,
{
    let (tx, rx) = mpsc::channel(BUFFER_SIZE);
    let input_path = input_path.as_ref().to_owned();

    let reader_handle = tokio::spawn(read_records(input_path, tx));
    let processor_handle = tokio::spawn(process_records(rx));

    // Decode errors are fatal
    reader_handle.await??;

    let outcome = processor_handle.await?;
    write_summary(&outcome, options, writer)?;
    Ok(())
}

/// Reads and decodes documents from a JSON-lines file.
/// Sends them through the provided channel.
async fn read_records(
    input_path: PathBuf,
    tx: mpsc::Sender<ReceiptRecord>,
) -> Result<(), StoreError> {
    let file = match File::open(&input_path).await {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %input_path.display(), "input file missing, treating as empty");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut lines = LinesStream::new(BufReader::new(file).lines());
    let mut line_number = 0;
    while let Some(line) = lines.next().await {
        line_number += 1;
        let Some(document) = decode_line(line_number, &line?)? else {
            continue;
        };
        if tx.send(ReceiptRecord::from(document)).await.is_err() {
            // Receiver dropped, exit gracefully
            break;
        }
    }
    Ok(())
}

/// Aggregates records received through the channel.
/// Returns the outcome once the channel is closed by the reader.
async fn process_records(
    mut rx: mpsc::Receiver<ReceiptRecord>,
) -> Result<Aggregation, AggregateError> {
    let mut aggregator = Aggregator::new();
    while let Some(record) = rx.recv().await {
        aggregator.process_record(&record, &mut TracingSink);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fixtures::EXAMPLE_SUMMARY;
    use std::fs;

    fn width(chart_width: usize) -> SummaryOptions {
        SummaryOptions { chart_width }
    }

    #[tokio::test]
    async fn test_example_input() -> Result<()> {
        let mut output = Vec::new();
        run("data/example_receipts.jsonl", &width(10), &mut output).await?;
        assert_eq!(String::from_utf8(output)?, EXAMPLE_SUMMARY);
        Ok(())
    }

    #[tokio::test]
    async fn test_records_without_items() -> Result<()> {
        let mut output = Vec::new();
        run("data/no_items.jsonl", &width(10), &mut output).await?;
        assert_eq!(
            String::from_utf8(output)?,
            "error: No valid category data to display.\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_input() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut output = Vec::new();
        run(dir.path().join("absent.jsonl"), &width(10), &mut output).await?;
        assert_eq!(
            String::from_utf8(output)?,
            "error: No data available in the collection.\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_line_is_fatal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("receipts.jsonl");
        fs::write(&path, "{\"items\": []}\n\n42\n")?;

        let mut output = Vec::new();
        let err = run(&path, &width(10), &mut output).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotAnObject { line: 3 })
        ));
        assert!(output.is_empty());
        Ok(())
    }
}
