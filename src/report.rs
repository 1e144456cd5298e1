//! Text presentation of documents and aggregation results.
//!
//! Everything here writes to a caller-supplied writer so the same rendering
//! serves stdout and tests.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

use crate::aggregator::{Aggregation, CategoryTotals};
use crate::dto::Document;
use crate::error::AggregateError;
use crate::io_utils::write_csv;

pub const NO_DATA: &str = "No data available in the collection.";
pub const NO_VALID_DATA: &str = "No valid category data to display.";

/// A one-line status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Warning(String),
    Error(String),
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Success(message) => write!(f, "ok: {}", message),
            Banner::Warning(message) => write!(f, "warning: {}", message),
            Banner::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Banners to show for an aggregation outcome. A clean run has none.
pub fn aggregation_banners(outcome: &Result<Aggregation, AggregateError>) -> Vec<Banner> {
    match outcome {
        Err(AggregateError::EmptyInput) => vec![Banner::Error(NO_DATA.to_owned())],
        Err(AggregateError::NoValidCategories) => vec![Banner::Error(NO_VALID_DATA.to_owned())],
        Ok(aggregation) if aggregation.warnings > 0 => vec![Banner::Warning(format!(
            "{} item(s) skipped due to invalid price",
            aggregation.warnings
        ))],
        Ok(_) => Vec::new(),
    }
}

/// The x/y data of the category chart, in first-appearance order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

impl ChartSeries {
    pub fn from_totals(totals: &CategoryTotals) -> Self {
        let (labels, values) = totals
            .iter()
            .map(|(category, total)| (category.to_owned(), total.normalize()))
            .unzip();
        Self { labels, values }
    }
}

/// Draws one row per category with a bar scaled to the largest positive
/// value. Non-positive values get an empty bar.
pub fn render_chart<W: Write>(series: &ChartSeries, width: usize, mut writer: W) -> io::Result<()> {
    let label_width = series
        .labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let peak = series
        .values
        .iter()
        .copied()
        .filter(|value| value.is_sign_positive() && !value.is_zero())
        .max();

    for (label, value) in series.labels.iter().zip(&series.values) {
        let filled = match peak {
            Some(peak) if value.is_sign_positive() => value
                .checked_mul(Decimal::from(width))
                .and_then(|scaled| scaled.checked_div(peak))
                .and_then(|cells| cells.round().to_usize())
                .unwrap_or(width)
                .min(width),
            _ => 0,
        };
        writeln!(
            writer,
            "{:<label_width$} |{:<width$}| {}",
            label,
            "#".repeat(filled),
            value,
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Total Price")]
    total_price: Decimal,
}

/// Writes the category totals as a CSV table.
pub fn write_summary_table<W: Write>(writer: W, totals: &CategoryTotals) -> csv::Result<()> {
    write_csv(
        writer,
        totals.iter().map(|(category, total)| SummaryRow {
            category,
            total_price: total.normalize(),
        }),
    )
}

/// Lists every document under a numbered header.
pub fn render_documents<W: Write>(documents: &[Document], mut writer: W) -> io::Result<()> {
    if documents.is_empty() {
        writeln!(writer, "{}", Banner::Error(NO_DATA.to_owned()))?;
        return Ok(());
    }
    for (index, document) in documents.iter().enumerate() {
        writeln!(writer, "Data {}", index + 1)?;
        writeln!(writer, "{}", serde_json::to_string_pretty(document)?)?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{aggregate, TracingSink};
    use crate::dto::ReceiptRecord;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn totals() -> CategoryTotals {
        let records: Vec<ReceiptRecord> = serde_json::from_value(json!([
            {"items": [
                {"category": "Food", "total_price": "10.00"},
                {"category": "Transport", "total_price": 5},
                {"category": "Food", "total_price": "2.50"},
                {"category": "Refund", "total_price": -1}
            ]}
        ]))
        .unwrap();
        aggregate(&records, &mut TracingSink).unwrap().totals
    }

    #[test]
    fn test_banners() {
        assert_eq!(
            aggregation_banners(&Err(AggregateError::EmptyInput)),
            vec![Banner::Error(NO_DATA.into())]
        );
        assert_eq!(
            aggregation_banners(&Err(AggregateError::NoValidCategories)),
            vec![Banner::Error(NO_VALID_DATA.into())]
        );
        assert_eq!(
            Banner::Warning("2 item(s) skipped due to invalid price".into()).to_string(),
            "warning: 2 item(s) skipped due to invalid price"
        );
    }

    #[test]
    fn test_chart_series_order_and_values() {
        let series = ChartSeries::from_totals(&totals());
        assert_eq!(series.labels, vec!["Food", "Transport", "Refund"]);
        assert_eq!(series.values, vec![dec!(12.5), dec!(5), dec!(-1)]);
    }

    #[test]
    fn test_render_chart() -> io::Result<()> {
        let mut output = Vec::new();
        render_chart(&ChartSeries::from_totals(&totals()), 10, &mut output)?;
        let expected = "\
Food      |##########| 12.5
Transport |####      | 5
Refund    |          | -1
";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
        Ok(())
    }

    #[test]
    fn test_summary_table() -> csv::Result<()> {
        let mut output = Vec::new();
        write_summary_table(&mut output, &totals())?;
        let expected = "Category,Total Price
Food,12.5
Transport,5
Refund,-1
";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
        Ok(())
    }

    #[test]
    fn test_render_documents() -> io::Result<()> {
        let documents: Vec<Document> = vec![serde_json::from_value(json!({"_id": 1})).unwrap()];
        let mut output = Vec::new();
        render_documents(&documents, &mut output)?;
        assert_eq!(String::from_utf8(output).unwrap(), "Data 1\n{\n  \"_id\": 1\n}\n\n");
        Ok(())
    }

    #[test]
    fn test_render_no_documents() -> io::Result<()> {
        let mut output = Vec::new();
        render_documents(&[], &mut output)?;
        assert_eq!(String::from_utf8(output).unwrap(), format!("error: {}\n", NO_DATA));
        Ok(())
    }
}
