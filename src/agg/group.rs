//! Grouped aggregations.
//!
//! Ordering is part of each operation's contract:
//!
//! - `sum_by_category`: first-appearance insertion order
//! - `sum_by_year` / `count_distinct_startups_by_year`: ascending year
//! - `top_n_by_startup` / `top_investor_cooccurrence`: descending value,
//!   ties broken stably by first appearance
//!
//! Rows with an undisclosed amount contribute nothing to summed measures;
//! a group whose every row is undisclosed does not appear at all (a zero
//! bar would misread as "disclosed zero").

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::agg::AggregationResult;
use crate::domain::{CategoryField, FundingRecord};

/// Group by startup, sum disclosed amounts, keep the `n` largest.
pub fn top_n_by_startup(records: &[&FundingRecord], n: usize) -> AggregationResult {
    let sums = sum_by_key(records, |r| Some(r.startup.as_str()));
    top_n_descending(sums, n)
}

/// Group by a categorical field, sum disclosed amounts.
///
/// Categories appear in order of their first appearance in the subset; rows
/// with a missing category are excluded from the grouping.
pub fn sum_by_category(records: &[&FundingRecord], field: CategoryField) -> AggregationResult {
    AggregationResult::from_entries(sum_by_key(records, |r| r.category(field)))
}

/// Sum of disclosed amounts per calendar year, ascending.
pub fn sum_by_year(records: &[&FundingRecord]) -> AggregationResult {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for r in records {
        if let Some(amount) = r.amount {
            *by_year.entry(r.year).or_insert(0.0) += amount;
        }
    }
    AggregationResult::from_entries(
        by_year
            .into_iter()
            .map(|(year, total)| (year.to_string(), total))
            .collect(),
    )
}

/// Count of distinct funded startups per calendar year, ascending.
///
/// Counting is independent of amounts: a startup with only undisclosed
/// rounds still counts as funded.
pub fn count_distinct_startups_by_year(records: &[&FundingRecord]) -> AggregationResult {
    let mut by_year: BTreeMap<i32, HashSet<&str>> = BTreeMap::new();
    for r in records {
        by_year.entry(r.year).or_default().insert(r.startup.as_str());
    }
    AggregationResult::from_entries(
        by_year
            .into_iter()
            .map(|(year, startups)| (year.to_string(), startups.len() as f64))
            .collect(),
    )
}

/// Split every row's investor list, flatten across the subset, count
/// occurrences, keep the `n` most frequent.
///
/// Occurrences are row mentions, not amounts, so undisclosed rows count.
pub fn top_investor_cooccurrence(records: &[&FundingRecord], n: usize) -> AggregationResult {
    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<f64> = Vec::new();

    for r in records {
        for token in r.investor_tokens() {
            match index.get(token) {
                Some(&i) => counts[i] += 1.0,
                None => {
                    index.insert(token.to_string(), counts.len());
                    order.push(token.to_string());
                    counts.push(1.0);
                }
            }
        }
    }

    let entries: Vec<(String, f64)> = order.into_iter().zip(counts).collect();
    top_n_descending(entries, n)
}

/// Insertion-ordered sum of disclosed amounts keyed by `key_fn`.
fn sum_by_key<'a>(
    records: &[&'a FundingRecord],
    key_fn: impl Fn(&'a FundingRecord) -> Option<&'a str>,
) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sums: Vec<f64> = Vec::new();

    for &r in records {
        let Some(key) = key_fn(r) else { continue };
        let Some(amount) = r.amount else { continue };

        match index.get(key) {
            Some(&i) => sums[i] += amount,
            None => {
                index.insert(key.to_string(), sums.len());
                order.push(key.to_string());
                sums.push(amount);
            }
        }
    }

    order.into_iter().zip(sums).collect()
}

/// Stable descending sort + truncate. `sort_by` is stable, so equal values
/// keep their first-appearance order.
fn top_n_descending(entries: Vec<(String, f64)>, n: usize) -> AggregationResult {
    let mut sorted = entries;
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    AggregationResult::from_entries(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(startup: &str, investors: &str, amount: Option<f64>, year: i32) -> FundingRecord {
        FundingRecord {
            date: NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
            month: 3,
            year,
            startup: startup.to_string(),
            vertical: None,
            city: None,
            round: None,
            investors: investors.to_string(),
            amount,
        }
    }

    fn spec_example() -> Vec<FundingRecord> {
        vec![
            rec("A", "X,Y", Some(10.0), 2020),
            rec("B", "X", Some(5.0), 2020),
            rec("A", "Y", Some(3.0), 2021),
        ]
    }

    #[test]
    fn sum_by_year_spec_example() {
        let rows = spec_example();
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = sum_by_year(&refs);
        assert_eq!(result.get("2020"), Some(15.0));
        assert_eq!(result.get("2021"), Some(3.0));
        let years: Vec<&str> = result.iter().map(|(k, _)| k).collect();
        assert_eq!(years, vec!["2020", "2021"]);
    }

    #[test]
    fn top_n_by_startup_spec_example() {
        let rows = spec_example();
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = top_n_by_startup(&refs, 1);
        let entries: Vec<(&str, f64)> = result.iter().collect();
        assert_eq!(entries, vec![("A", 13.0)]);
    }

    #[test]
    fn top_n_returns_fewer_when_fewer_groups_exist() {
        let rows = spec_example();
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = top_n_by_startup(&refs, 10);
        assert_eq!(result.len(), 2);

        // Strictly descending by value here.
        let values: Vec<f64> = result.iter().map(|(_, v)| v).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn top_n_ties_keep_first_seen_order() {
        let rows = vec![
            rec("Zeta", "X", Some(5.0), 2020),
            rec("Alpha", "X", Some(5.0), 2020),
            rec("Mid", "X", Some(7.0), 2020),
        ];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = top_n_by_startup(&refs, 3);
        let keys: Vec<&str> = result.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Mid", "Zeta", "Alpha"]);
    }

    #[test]
    fn sum_by_category_uses_first_appearance_order() {
        let mut rows = spec_example();
        rows[0].vertical = Some("Commerce".to_string());
        rows[1].vertical = Some("FinTech".to_string());
        rows[2].vertical = Some("Commerce".to_string());
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = sum_by_category(&refs, CategoryField::Vertical);
        let entries: Vec<(&str, f64)> = result.iter().collect();
        assert_eq!(entries, vec![("Commerce", 13.0), ("FinTech", 5.0)]);
    }

    #[test]
    fn undisclosed_amounts_are_excluded_not_zeroed() {
        let mut rows = spec_example();
        rows[0].vertical = Some("Commerce".to_string());
        rows[1].vertical = Some("FinTech".to_string());
        rows[2].vertical = Some("Commerce".to_string());
        rows[1].amount = None;
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        // FinTech's only row is undisclosed, so the category disappears
        // entirely rather than showing a misleading zero.
        let result = sum_by_category(&refs, CategoryField::Vertical);
        let entries: Vec<(&str, f64)> = result.iter().collect();
        assert_eq!(entries, vec![("Commerce", 13.0)]);

        let by_year = sum_by_year(&refs);
        assert_eq!(by_year.get("2020"), Some(10.0));
    }

    #[test]
    fn category_sums_conserve_the_restricted_total() {
        let mut rows = spec_example();
        rows[0].vertical = Some("Commerce".to_string());
        rows[1].vertical = None; // no category: out of the grouping
        rows[2].vertical = Some("FinTech".to_string());
        rows[2].amount = None; // undisclosed: out of the sums
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let grouped = sum_by_category(&refs, CategoryField::Vertical);
        let restricted: f64 = refs
            .iter()
            .filter(|r| r.category(CategoryField::Vertical).is_some())
            .filter_map(|r| r.amount)
            .sum();
        assert!((grouped.total() - restricted).abs() < 1e-12);
    }

    #[test]
    fn distinct_startups_by_year_counts_undisclosed_rows() {
        let mut rows = spec_example();
        rows[1].amount = None;
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = count_distinct_startups_by_year(&refs);
        assert_eq!(result.get("2020"), Some(2.0));
        assert_eq!(result.get("2021"), Some(1.0));
    }

    #[test]
    fn cooccurrence_counts_flattened_tokens() {
        let rows = spec_example();
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let result = top_investor_cooccurrence(&refs, 10);
        let entries: Vec<(&str, f64)> = result.iter().collect();
        // X and Y both appear twice; X was seen first.
        assert_eq!(entries, vec![("X", 2.0), ("Y", 2.0)]);
    }

    #[test]
    fn empty_subset_yields_empty_results() {
        let refs: Vec<&FundingRecord> = Vec::new();
        assert!(top_n_by_startup(&refs, 5).is_empty());
        assert!(sum_by_category(&refs, CategoryField::City).is_empty());
        assert!(sum_by_year(&refs).is_empty());
        assert!(count_distinct_startups_by_year(&refs).is_empty());
        assert!(top_investor_cooccurrence(&refs, 5).is_empty());
    }

    #[test]
    fn aggregations_are_idempotent() {
        let rows = spec_example();
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        assert_eq!(sum_by_year(&refs), sum_by_year(&refs));
        assert_eq!(top_n_by_startup(&refs, 2), top_n_by_startup(&refs, 2));
        assert_eq!(
            top_investor_cooccurrence(&refs, 5),
            top_investor_cooccurrence(&refs, 5)
        );
    }
}
