//! View assembler: page → fixed sequence of aggregation calls.
//!
//! Stateless per request. Each function takes the full record list, applies
//! the page's filter, runs the page's fixed aggregation set, and returns a
//! `View`. Empty subsets assemble normally: widgets simply carry empty
//! results and renderers show a "no data" state.

use crate::agg::{
    self, filter_by_entity, head_records, AggregationResult,
};
use crate::domain::{
    CategoryField, Column, DashboardConfig, EntityField, FundingRecord, InvestorMatch, YearSeries,
};
use crate::view::{Metric, MetricValue, View, ViewItem};

/// The overall-analysis page: headline metrics plus one year series.
pub fn overall_view(records: &[&FundingRecord], series: YearSeries) -> View {
    let metrics = vec![
        Metric {
            label: "Total invested amount".to_string(),
            value: MetricValue::Amount(agg::total_amount(records)),
        },
        Metric {
            label: "Maximum single investment".to_string(),
            value: match agg::max_amount_record(records).and_then(|r| r.amount) {
                Some(v) => MetricValue::Amount(v),
                None => MetricValue::NoData,
            },
        },
        Metric {
            label: "Average funding per startup".to_string(),
            value: match agg::average_funding_per_startup(records) {
                Some(v) => MetricValue::Amount(v),
                None => MetricValue::NoData,
            },
        },
        Metric {
            label: "Funded startups".to_string(),
            value: MetricValue::Count(agg::count_distinct_startups(records)),
        },
    ];

    let (title, data) = year_series(records, series);

    View {
        title: "Overall Analysis".to_string(),
        items: vec![
            ViewItem::Metrics(metrics),
            ViewItem::Line { title, data },
        ],
    }
}

/// The per-investor page.
pub fn investor_view(
    records: &[&FundingRecord],
    name: &str,
    config: &DashboardConfig,
) -> View {
    let subset = filter_by_entity(records, name, EntityField::Investors, config.investor_match);

    // The selected investor trivially co-occurs with themselves in every
    // row; drop that entry from the displayed ranking.
    let similar = agg::top_investor_cooccurrence(&subset, config.similar_n + 1)
        .without_key(name)
        .truncated(config.similar_n);

    let items = vec![
        ViewItem::Table {
            title: format!("Last {} investments", config.recent_n),
            data: head_records(
                &subset,
                config.recent_n,
                &[
                    Column::Date,
                    Column::Startup,
                    Column::Vertical,
                    Column::City,
                    Column::Round,
                    Column::Amount,
                ],
            ),
        },
        ViewItem::Bar {
            title: "Biggest investments".to_string(),
            data: agg::top_n_by_startup(&subset, config.top_n),
        },
        ViewItem::Share {
            title: "Most invested verticals".to_string(),
            data: agg::sum_by_category(&subset, CategoryField::Vertical),
        },
        ViewItem::Share {
            title: "Most invested rounds".to_string(),
            data: agg::sum_by_category(&subset, CategoryField::Round),
        },
        ViewItem::Share {
            title: "Most invested cities".to_string(),
            data: agg::sum_by_category(&subset, CategoryField::City),
        },
        ViewItem::Line {
            title: "Investments over the years".to_string(),
            data: agg::sum_by_year(&subset),
        },
        ViewItem::Share {
            title: "Similar investors".to_string(),
            data: similar,
        },
    ];

    View {
        title: name.to_string(),
        items,
    }
}

/// The per-startup page.
///
/// Filters by exact startup name; `InvestorMatch` does not apply here.
pub fn startup_view(records: &[&FundingRecord], name: &str, config: &DashboardConfig) -> View {
    let subset = filter_by_entity(
        records,
        name,
        EntityField::Startup,
        InvestorMatch::Exact,
    );

    let metrics = vec![
        Metric {
            label: "Total raised".to_string(),
            value: MetricValue::Amount(agg::total_amount(&subset)),
        },
        Metric {
            label: "Funding rounds".to_string(),
            value: MetricValue::Count(subset.len()),
        },
        Metric {
            label: "Distinct investors".to_string(),
            value: MetricValue::Count(agg::distinct_investors(&subset).len()),
        },
    ];

    let items = vec![
        ViewItem::Metrics(metrics),
        ViewItem::Table {
            title: "Funding rounds".to_string(),
            data: head_records(
                &subset,
                subset.len(),
                &[
                    Column::Date,
                    Column::Round,
                    Column::City,
                    Column::Investors,
                    Column::Amount,
                ],
            ),
        },
        ViewItem::Share {
            title: "Amount by round".to_string(),
            data: agg::sum_by_category(&subset, CategoryField::Round),
        },
        ViewItem::Share {
            title: "Amount by city".to_string(),
            data: agg::sum_by_category(&subset, CategoryField::City),
        },
        ViewItem::Line {
            title: "Funding over the years".to_string(),
            data: agg::sum_by_year(&subset),
        },
        ViewItem::Share {
            title: "Investors".to_string(),
            data: agg::top_investor_cooccurrence(&subset, config.similar_n),
        },
    ];

    View {
        title: name.to_string(),
        items,
    }
}

fn year_series(records: &[&FundingRecord], series: YearSeries) -> (String, AggregationResult) {
    match series {
        YearSeries::Amount => (
            "Investments over the years (amount)".to_string(),
            agg::sum_by_year(records),
        ),
        YearSeries::Startups => (
            "Investments over the years (startups)".to_string(),
            agg::count_distinct_startups_by_year(records),
        ),
    }
}
