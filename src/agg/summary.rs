//! Scalar summaries and entity selection lists.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::FundingRecord;

/// Sum of disclosed amounts over the subset. Empty subset sums to zero.
pub fn total_amount(records: &[&FundingRecord]) -> f64 {
    records.iter().filter_map(|r| r.amount).sum()
}

/// The record with the largest disclosed amount.
///
/// Ties are broken deterministically: the first occurrence in dataset order
/// wins (strict `>` while scanning), so repeated calls return the same
/// record. `None` iff no row has a disclosed amount.
pub fn max_amount_record<'a>(records: &[&'a FundingRecord]) -> Option<&'a FundingRecord> {
    let mut best: Option<(&'a FundingRecord, f64)> = None;
    for &r in records {
        let Some(amount) = r.amount else { continue };
        match best {
            Some((_, best_amount)) if amount <= best_amount => {}
            _ => best = Some((r, amount)),
        }
    }
    best.map(|(r, _)| r)
}

/// Mean of per-startup summed disclosed amounts.
///
/// Startups with only undisclosed rounds are excluded from the mean;
/// `None` when no startup has a disclosed amount (never a division by
/// zero or NaN).
pub fn average_funding_per_startup(records: &[&FundingRecord]) -> Option<f64> {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for r in records {
        if let Some(amount) = r.amount {
            *sums.entry(r.startup.as_str()).or_insert(0.0) += amount;
        }
    }
    if sums.is_empty() {
        return None;
    }
    let total: f64 = sums.values().sum();
    Some(total / sums.len() as f64)
}

/// Count of distinct startup names in the subset.
pub fn count_distinct_startups(records: &[&FundingRecord]) -> usize {
    records
        .iter()
        .map(|r| r.startup.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Sorted, deduplicated startup names (the startup-page selection list).
pub fn distinct_startups(records: &[&FundingRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.startup.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, deduplicated investor names derived by splitting the
/// `investors` field across all rows (the investor-page selection list).
pub fn distinct_investors(records: &[&FundingRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.investor_tokens())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(startup: &str, investors: &str, amount: Option<f64>) -> FundingRecord {
        FundingRecord {
            date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            month: 6,
            year: 2021,
            startup: startup.to_string(),
            vertical: None,
            city: None,
            round: None,
            investors: investors.to_string(),
            amount,
        }
    }

    #[test]
    fn total_amount_skips_undisclosed() {
        let rows = vec![
            rec("A", "X", Some(10.0)),
            rec("B", "Y", None),
            rec("C", "Z", Some(2.5)),
        ];
        let refs: Vec<&FundingRecord> = rows.iter().collect();
        assert!((total_amount(&refs) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn max_amount_record_tie_takes_first_occurrence() {
        let rows = vec![
            rec("First", "X", Some(50.0)),
            rec("Second", "Y", Some(50.0)),
            rec("Small", "Z", Some(1.0)),
        ];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let a = max_amount_record(&refs).unwrap();
        let b = max_amount_record(&refs).unwrap();
        assert_eq!(a.startup, "First");
        assert_eq!(b.startup, "First");
    }

    #[test]
    fn max_amount_record_none_when_all_undisclosed() {
        let rows = vec![rec("A", "X", None), rec("B", "Y", None)];
        let refs: Vec<&FundingRecord> = rows.iter().collect();
        assert!(max_amount_record(&refs).is_none());
        assert!(max_amount_record(&[]).is_none());
    }

    #[test]
    fn average_is_mean_of_per_startup_sums() {
        // A: 10 + 3 = 13, B: 5 -> mean = 9
        let rows = vec![
            rec("A", "X", Some(10.0)),
            rec("B", "Y", Some(5.0)),
            rec("A", "Z", Some(3.0)),
        ];
        let refs: Vec<&FundingRecord> = rows.iter().collect();
        let avg = average_funding_per_startup(&refs).unwrap();
        assert!((avg - 9.0).abs() < 1e-12);
    }

    #[test]
    fn average_is_none_without_disclosed_amounts() {
        let rows = vec![rec("A", "X", None)];
        let refs: Vec<&FundingRecord> = rows.iter().collect();
        assert!(average_funding_per_startup(&refs).is_none());
        assert!(average_funding_per_startup(&[]).is_none());
    }

    #[test]
    fn count_distinct_startups_spec_example() {
        let rows = vec![
            rec("A", "X,Y", Some(10.0)),
            rec("B", "X", Some(5.0)),
            rec("A", "Y", Some(3.0)),
        ];
        let refs: Vec<&FundingRecord> = rows.iter().collect();
        assert_eq!(count_distinct_startups(&refs), 2);
    }

    #[test]
    fn selection_lists_are_sorted_and_deduplicated() {
        let rows = vec![
            rec("Zed", "Beta, Alpha", Some(1.0)),
            rec("Ada", "Alpha", None),
            rec("Zed", "Gamma", Some(2.0)),
        ];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        assert_eq!(distinct_startups(&refs), vec!["Ada", "Zed"]);
        assert_eq!(distinct_investors(&refs), vec!["Alpha", "Beta", "Gamma"]);
    }
}
