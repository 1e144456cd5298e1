use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::dto::{LineItem, PriceField, ReceiptRecord};
use crate::error::AggregateError;
use crate::price::{number_to_price, parse_price};

/// A line item whose price was present but could not be coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWarning {
    /// Position of the record in the input, 0-based.
    pub record: usize,
    /// Position of the item within the record's `items`, 0-based.
    pub item: usize,
    pub category: String,
    pub raw_price: Value,
}

impl fmt::Display for PriceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid price value for item (record {}, item {}): category={:?} total_price={}",
            self.record, self.item, self.category, self.raw_price
        )
    }
}

/// Receives warnings for skipped items as they are found.
pub trait WarningSink {
    fn warn(&mut self, warning: &PriceWarning);
}

impl<F> WarningSink for F
where
    F: FnMut(&PriceWarning),
{
    fn warn(&mut self, warning: &PriceWarning) {
        (self)(warning)
    }
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: &PriceWarning) {
        warn!(
            record = warning.record,
            item = warning.item,
            category = %warning.category,
            total_price = %warning.raw_price,
            "invalid price value for item"
        );
    }
}

/// Summed prices per category, in order of first appearance.
///
/// Read-only once returned from [`Aggregator::finish`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    totals: IndexMap<String, Decimal>,
}

impl CategoryTotals {
    fn add(&mut self, category: &str, amount: Decimal) {
        *self
            .totals
            .entry(category.to_owned())
            .or_insert(Decimal::ZERO) += amount;
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.totals.iter().map(|(category, total)| (category.as_str(), *total))
    }

    /// Sum across all categories.
    pub fn grand_total(&self) -> Decimal {
        self.totals.values().copied().sum()
    }
}

/// Result of a successful aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub totals: CategoryTotals,
    /// Records seen, including those without items.
    pub records: usize,
    /// Line items that contributed to a total.
    pub aggregated_items: usize,
    /// Line items excluded for any reason.
    pub skipped_items: usize,
    /// Line items excluded because their price failed coercion.
    pub warnings: usize,
}

enum ItemOutcome {
    Counted,
    Skipped,
    Warned(PriceWarning),
}

/// Single-pass reduction from receipt records to category totals.
///
/// Feed records with [`Aggregator::process_record`], then call
/// [`Aggregator::finish`]. Each run starts from a fresh aggregator.
#[derive(Debug, Default)]
pub struct Aggregator {
    totals: CategoryTotals,
    records: usize,
    aggregated_items: usize,
    skipped_items: usize,
    warnings: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_record<S>(&mut self, record: &ReceiptRecord, sink: &mut S)
    where
        S: WarningSink + ?Sized,
    {
        let index = self.records;
        self.records += 1;

        for (item_index, item) in record.items().iter().enumerate() {
            match self.process_item(index, item_index, item) {
                ItemOutcome::Counted => self.aggregated_items += 1,
                ItemOutcome::Skipped => self.skipped_items += 1,
                ItemOutcome::Warned(warning) => {
                    self.skipped_items += 1;
                    self.warnings += 1;
                    sink.warn(&warning);
                }
            }
        }
    }

    fn process_item(&mut self, record: usize, item: usize, line: &LineItem) -> ItemOutcome {
        // A missing category is expected, not anomalous: no warning
        let Some(category) = line.category.label() else {
            return ItemOutcome::Skipped;
        };
        if line.total_price.is_missing() {
            return ItemOutcome::Skipped;
        }

        let price = match &line.total_price {
            PriceField::Number(number) => number_to_price(number),
            PriceField::Text(text) => parse_price(text),
            PriceField::Invalid(_) | PriceField::Absent => None,
        };
        match price {
            Some(amount) => {
                self.totals.add(category, amount);
                ItemOutcome::Counted
            }
            None => ItemOutcome::Warned(PriceWarning {
                record,
                item,
                category: category.to_owned(),
                raw_price: line.total_price.to_value(),
            }),
        }
    }

    pub fn finish(self) -> Result<Aggregation, AggregateError> {
        debug!(
            records = self.records,
            aggregated = self.aggregated_items,
            skipped = self.skipped_items,
            warnings = self.warnings,
            "aggregation finished"
        );
        if self.records == 0 {
            return Err(AggregateError::EmptyInput);
        }
        if self.totals.is_empty() {
            return Err(AggregateError::NoValidCategories);
        }
        Ok(Aggregation {
            totals: self.totals,
            records: self.records,
            aggregated_items: self.aggregated_items,
            skipped_items: self.skipped_items,
            warnings: self.warnings,
        })
    }
}

/// Aggregates a materialized sequence of records in one call.
pub fn aggregate<'a, I, S>(records: I, sink: &mut S) -> Result<Aggregation, AggregateError>
where
    I: IntoIterator<Item = &'a ReceiptRecord>,
    S: WarningSink + ?Sized,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.process_record(record, sink);
    }
    aggregator.finish()
}
