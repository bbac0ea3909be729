//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while assembling views
//! - exported to JSON/CSV
//! - rendered by either the text reports or the TUI

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Overall,
    Startup,
    Investor,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Overall, Page::Startup, Page::Investor];

    /// Human-readable label for headers and tabs.
    pub fn display_name(self) -> &'static str {
        match self {
            Page::Overall => "Overall Analysis",
            Page::Startup => "Startup",
            Page::Investor => "Investor",
        }
    }

    pub fn next(self) -> Page {
        match self {
            Page::Overall => Page::Startup,
            Page::Startup => Page::Investor,
            Page::Investor => Page::Overall,
        }
    }

    pub fn prev(self) -> Page {
        match self {
            Page::Overall => Page::Investor,
            Page::Startup => Page::Overall,
            Page::Investor => Page::Startup,
        }
    }

    /// Entity pages need a selected startup/investor name before a view
    /// can be assembled; the overall page does not.
    pub fn needs_entity(self) -> bool {
        !matches!(self, Page::Overall)
    }
}

/// Which record field an entity filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityField {
    /// Exact match on the startup name.
    Startup,
    /// Match against the comma-separated `investors` cell (see `InvestorMatch`).
    Investors,
}

/// How investor-name matching treats the comma-separated `investors` cell.
///
/// The cell has no escaping rule for names that contain the delimiter, so the
/// two modes genuinely diverge on names that are substrings of other names:
///
/// - `Exact`: split on `,`, trim tokens, keep the row iff a token equals the
///   queried name. Recommended; a name never matches a superstring of itself.
/// - `Contains`: raw substring containment over the whole cell. Kept for
///   compatibility with the source data pipeline, which filtered this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InvestorMatch {
    Exact,
    Contains,
}

impl InvestorMatch {
    pub fn display_name(self) -> &'static str {
        match self {
            InvestorMatch::Exact => "exact",
            InvestorMatch::Contains => "contains",
        }
    }

    pub fn toggled(self) -> InvestorMatch {
        match self {
            InvestorMatch::Exact => InvestorMatch::Contains,
            InvestorMatch::Contains => InvestorMatch::Exact,
        }
    }
}

/// Categorical grouping fields for sum-by-category aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CategoryField {
    Vertical,
    Round,
    City,
}

impl CategoryField {
    pub fn display_name(self) -> &'static str {
        match self {
            CategoryField::Vertical => "vertical",
            CategoryField::Round => "round",
            CategoryField::City => "city",
        }
    }
}

/// Which investments-over-the-years series the overall page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum YearSeries {
    /// Sum of disclosed amounts per year.
    Amount,
    /// Count of distinct funded startups per year.
    Startups,
}

impl YearSeries {
    pub fn display_name(self) -> &'static str {
        match self {
            YearSeries::Amount => "Amount",
            YearSeries::Startups => "Startups",
        }
    }

    pub fn toggled(self) -> YearSeries {
        match self {
            YearSeries::Amount => YearSeries::Startups,
            YearSeries::Startups => YearSeries::Amount,
        }
    }
}

/// Columns available to tabular projections (`head_records`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Date,
    Startup,
    Vertical,
    City,
    Round,
    Investors,
    Amount,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Startup => "startup",
            Column::Vertical => "vertical",
            Column::City => "city",
            Column::Round => "round",
            Column::Investors => "investors",
            Column::Amount => "amount",
        }
    }

    /// Render one cell. Missing categoricals render empty; an undisclosed
    /// amount renders as the word, not as zero.
    pub fn cell(self, record: &FundingRecord) -> String {
        match self {
            Column::Date => record.date.format("%Y-%m-%d").to_string(),
            Column::Startup => record.startup.clone(),
            Column::Vertical => record.vertical.clone().unwrap_or_default(),
            Column::City => record.city.clone().unwrap_or_default(),
            Column::Round => record.round.clone().unwrap_or_default(),
            Column::Investors => record.investors.clone(),
            Column::Amount => match record.amount {
                Some(v) => format!("{v:.2}"),
                None => "undisclosed".to_string(),
            },
        }
    }
}

/// One row of the funding-event table.
///
/// `month`/`year` are derived from `date` once at load time. `amount` is the
/// funding amount in crores; `None` means the amount was undisclosed or
/// unparseable, and such rows are excluded from sums and averages (never
/// zero-filled, which would bias averages).
#[derive(Debug, Clone, Serialize)]
pub struct FundingRecord {
    pub date: NaiveDate,
    pub month: u32,
    pub year: i32,
    pub startup: String,
    pub vertical: Option<String>,
    pub city: Option<String>,
    pub round: Option<String>,
    /// Raw comma-separated investor list. There is no escaping rule for
    /// names containing commas; splitting on every comma is a documented
    /// limitation of the dataset, not something we try to repair.
    pub investors: String,
    pub amount: Option<f64>,
}

impl FundingRecord {
    /// Trimmed, non-empty investor names from the raw cell.
    pub fn investor_tokens(&self) -> impl Iterator<Item = &str> {
        self.investors
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The categorical value for a grouping field, if present.
    pub fn category(&self, field: CategoryField) -> Option<&str> {
        let value = match field {
            CategoryField::Vertical => self.vertical.as_deref(),
            CategoryField::Round => self.round.as_deref(),
            CategoryField::City => self.city.as_deref(),
        };
        value.map(str::trim).filter(|s| !s.is_empty())
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    /// Investor-name matching mode (see `InvestorMatch`).
    pub investor_match: InvestorMatch,
    /// Year-series flavor on the overall page.
    pub series: YearSeries,
    /// Entries in "biggest investments" style rankings.
    pub top_n: usize,
    /// Entries in co-occurring-investor rankings.
    pub similar_n: usize,
    /// Rows in "recent investments" tables.
    pub recent_n: usize,

    pub export_results: Option<PathBuf>,
    pub export_view: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_investors(investors: &str) -> FundingRecord {
        FundingRecord {
            date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            month: 5,
            year: 2020,
            startup: "Acme".to_string(),
            vertical: Some("FinTech".to_string()),
            city: None,
            round: Some("Seed".to_string()),
            investors: investors.to_string(),
            amount: Some(12.0),
        }
    }

    #[test]
    fn investor_tokens_trim_and_skip_empty() {
        let r = record_with_investors(" Alpha Fund, Beta Partners ,, Gamma ");
        let tokens: Vec<&str> = r.investor_tokens().collect();
        assert_eq!(tokens, vec!["Alpha Fund", "Beta Partners", "Gamma"]);
    }

    #[test]
    fn category_treats_blank_as_missing() {
        let mut r = record_with_investors("Alpha");
        r.city = Some("  ".to_string());
        assert_eq!(r.category(CategoryField::Vertical), Some("FinTech"));
        assert_eq!(r.category(CategoryField::City), None);
        assert_eq!(r.category(CategoryField::Round), Some("Seed"));
    }
}
