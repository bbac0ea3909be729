//! Entity filter predicate.
//!
//! `filter_by_entity` selects the rows mentioning a startup or investor.
//! The filter is pure, preserves dataset order, and returns an empty subset
//! (never an error) when nothing matches.

use crate::domain::{EntityField, FundingRecord, InvestorMatch};

/// Select the rows mentioning `name` in the given field.
///
/// - `EntityField::Startup`: exact match on the startup name.
/// - `EntityField::Investors`: token membership or raw substring
///   containment, depending on `investor_match` (see `InvestorMatch` for
///   why the two modes diverge).
pub fn filter_by_entity<'a>(
    records: &[&'a FundingRecord],
    name: &str,
    field: EntityField,
    investor_match: InvestorMatch,
) -> Vec<&'a FundingRecord> {
    records
        .iter()
        .copied()
        .filter(|r| match field {
            EntityField::Startup => r.startup == name,
            EntityField::Investors => investors_mention(r, name, investor_match),
        })
        .collect()
}

fn investors_mention(record: &FundingRecord, name: &str, mode: InvestorMatch) -> bool {
    match mode {
        InvestorMatch::Exact => record.investor_tokens().any(|token| token == name),
        InvestorMatch::Contains => record.investors.contains(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(startup: &str, investors: &str) -> FundingRecord {
        FundingRecord {
            date: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
            month: 1,
            year: 2020,
            startup: startup.to_string(),
            vertical: None,
            city: None,
            round: None,
            investors: investors.to_string(),
            amount: Some(1.0),
        }
    }

    #[test]
    fn startup_filter_is_exact() {
        let rows = vec![rec("Acme", "X"), rec("Acme Labs", "X"), rec("Acme", "Y")];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let subset = filter_by_entity(&refs, "Acme", EntityField::Startup, InvestorMatch::Exact);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.startup == "Acme"));
    }

    #[test]
    fn investor_filter_spec_example() {
        // Rows: ("A", "X,Y"), ("B", "X"), ("A", "Y"). Filtering by "X" keeps
        // the first two only, under both matching modes.
        let rows = vec![rec("A", "X,Y"), rec("B", "X"), rec("A", "Y")];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        for mode in [InvestorMatch::Exact, InvestorMatch::Contains] {
            let subset = filter_by_entity(&refs, "X", EntityField::Investors, mode);
            let startups: Vec<&str> = subset.iter().map(|r| r.startup.as_str()).collect();
            assert_eq!(startups, vec!["A", "B"], "mode {mode:?}");
        }
    }

    #[test]
    fn contains_mode_overmatches_substring_names() {
        // "Alpha" is a substring of "Alpha Global"; the legacy substring mode
        // cannot tell the two investors apart, the token mode can.
        let rows = vec![rec("A", "Alpha Global"), rec("B", "Alpha, Beta")];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let loose = filter_by_entity(
            &refs,
            "Alpha",
            EntityField::Investors,
            InvestorMatch::Contains,
        );
        assert_eq!(loose.len(), 2);

        let exact = filter_by_entity(&refs, "Alpha", EntityField::Investors, InvestorMatch::Exact);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].startup, "B");
    }

    #[test]
    fn exact_mode_trims_tokens() {
        let rows = vec![rec("A", " Alpha ,  Beta Fund ")];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let subset = filter_by_entity(
            &refs,
            "Beta Fund",
            EntityField::Investors,
            InvestorMatch::Exact,
        );
        assert_eq!(subset.len(), 1);
    }

    #[test]
    fn unknown_entity_yields_empty_subset() {
        let rows = vec![rec("A", "X"), rec("B", "Y")];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        for field in [EntityField::Startup, EntityField::Investors] {
            let subset = filter_by_entity(&refs, "Nobody", field, InvestorMatch::Exact);
            assert!(subset.is_empty());
        }
    }

    #[test]
    fn filter_preserves_dataset_order() {
        let rows = vec![rec("B", "X"), rec("A", "X"), rec("C", "X")];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let subset = filter_by_entity(&refs, "X", EntityField::Investors, InvestorMatch::Exact);
        let startups: Vec<&str> = subset.iter().map(|r| r.startup.as_str()).collect();
        assert_eq!(startups, vec!["B", "A", "C"]);
    }
}
