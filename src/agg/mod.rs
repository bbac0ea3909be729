//! Aggregation engine.
//!
//! A fixed catalog of deterministic transformations over funding records:
//!
//! - entity filters (`filter`)
//! - grouped aggregations (`group`)
//! - scalar summaries (`summary`)
//! - tabular projections (`table`)
//!
//! Every operation is a pure function of its inputs: same subset in, same
//! result out, with the iteration order of each result defined by the
//! operation itself (first-appearance, ascending year, or descending value
//! with stable ties). Nothing here holds state across calls.

use serde::Serialize;

pub mod filter;
pub mod group;
pub mod summary;
pub mod table;

pub use filter::filter_by_entity;
pub use group::{
    count_distinct_startups_by_year, sum_by_category, sum_by_year, top_investor_cooccurrence,
    top_n_by_startup,
};
pub use summary::{
    average_funding_per_startup, count_distinct_startups, distinct_investors, distinct_startups,
    max_amount_record, total_amount,
};
pub use table::{TableData, head_records};

/// An ordered key → value mapping produced by a grouped aggregation.
///
/// The entry order is part of each operation's contract and is consumed
/// directly by renderers (bar labels left to right, table rows top to
/// bottom), so this is a plain ordered sequence rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    entries: Vec<(String, f64)>,
}

impl AggregationResult {
    pub fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear-scan lookup; results are small (bounded by distinct keys).
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|(_, v)| *v)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// A copy without the given key, preserving order. Used by view
    /// assembly, e.g. to drop the selected investor from its own
    /// co-occurrence ranking.
    pub fn without_key(&self, key: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    pub fn truncated(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }
}
