//! View model: a page's renderable content.
//!
//! A `View` is an ordered list of widgets, each carrying one aggregation
//! result. The assembler (`assemble`) decides *what* to compute per page;
//! renderers (text report or TUI) decide *how* each widget looks. Neither
//! side owns the dataset and nothing here mutates it.

use serde::Serialize;

use crate::agg::{AggregationResult, TableData};

pub mod assemble;

pub use assemble::{investor_view, overall_view, startup_view};

/// A headline number on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
}

/// Metric payloads stay numeric; currency formatting is a renderer concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricValue {
    /// An amount in crores.
    Amount(f64),
    Count(usize),
    /// Nothing to show (e.g. average over zero startups); rendered as a
    /// "no data" placeholder, never an error.
    NoData,
}

/// One renderable widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewItem {
    Metrics(Vec<Metric>),
    /// Ranked categorical series (bar chart).
    Bar {
        title: String,
        data: AggregationResult,
    },
    /// Proportional categorical series (pie/share chart).
    Share {
        title: String,
        data: AggregationResult,
    },
    /// Series over years (line chart).
    Line {
        title: String,
        data: AggregationResult,
    },
    Table {
        title: String,
        data: TableData,
    },
}

/// An assembled page, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub title: String,
    pub items: Vec<ViewItem>,
}

impl View {
    /// First table widget, if any (the TUI pins it to a dedicated pane).
    pub fn first_table(&self) -> Option<(&str, &TableData)> {
        self.items.iter().find_map(|item| match item {
            ViewItem::Table { title, data } => Some((title.as_str(), data)),
            _ => None,
        })
    }

    /// First line widget, if any.
    pub fn first_line(&self) -> Option<(&str, &AggregationResult)> {
        self.items.iter().find_map(|item| match item {
            ViewItem::Line { title, data } => Some((title.as_str(), data)),
            _ => None,
        })
    }

    /// Bar and share widgets, in assembly order.
    pub fn categorical_items(&self) -> Vec<(&str, &AggregationResult)> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ViewItem::Bar { title, data } | ViewItem::Share { title, data } => {
                    Some((title.as_str(), data))
                }
                _ => None,
            })
            .collect()
    }

    pub fn metrics(&self) -> Option<&[Metric]> {
        self.items.iter().find_map(|item| match item {
            ViewItem::Metrics(metrics) => Some(metrics.as_slice()),
            _ => None,
        })
    }
}
