mod aggregator;
mod dto;
mod error;
mod io_utils;
mod price;
mod report;
mod runner;
mod stores;

pub use aggregator::{
    aggregate, Aggregation, Aggregator, CategoryTotals, PriceWarning, TracingSink, WarningSink,
};
pub use dto::{CategoryField, Document, LineItem, PriceField, ReceiptRecord};
pub use error::{AggregateError, StoreError};
pub use price::parse_price;
pub use report::{
    aggregation_banners, render_chart, render_documents, write_summary_table, Banner,
    ChartSeries,
};
pub use runner::{insert, list, run, run_async, SummaryOptions, DEFAULT_CHART_WIDTH};
pub use stores::{JsonlStore, MemoryStore, ReceiptStore};
