//! Runners wire the document store, the aggregator and the text report
//! together and write the result to a writer.
//!
//! The summary is available as a synchronous runner over any
//! [`ReceiptStore`](crate::stores::ReceiptStore) and as an asynchronous runner
//! streaming a JSON-lines file.
//!
mod async_runner;
mod sync_runner;

pub use async_runner::run as run_async;
pub use sync_runner::{insert, list, run};

use std::io::Write;

use crate::aggregator::Aggregation;
use crate::error::AggregateError;
use crate::report::{aggregation_banners, render_chart, write_summary_table, ChartSeries};

pub const DEFAULT_CHART_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Columns used by the longest chart bar.
    pub chart_width: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

/// Writes banners, then the chart and the summary table when there is
/// something to show.
fn write_summary<W: Write>(
    outcome: &Result<Aggregation, AggregateError>,
    options: &SummaryOptions,
    mut writer: W,
) -> csv::Result<()> {
    for banner in aggregation_banners(outcome) {
        writeln!(writer, "{}", banner)?;
    }
    if let Ok(aggregation) = outcome {
        render_chart(
            &ChartSeries::from_totals(&aggregation.totals),
            options.chart_width,
            &mut writer,
        )?;
        writeln!(writer)?;
        write_summary_table(&mut writer, &aggregation.totals)?;
    }
    Ok(())
}
