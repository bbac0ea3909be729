//! Tabular projections.
//!
//! `head_records` is the only aggregation that returns rows rather than a
//! key → value mapping: the first `n` rows of a subset (dataset order),
//! projected to the requested columns as display strings.

use serde::Serialize;

use crate::domain::{Column, FundingRecord};

/// Ordered rows × named columns, ready for a table renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project the first `n` rows of `records` to the given columns.
pub fn head_records(records: &[&FundingRecord], n: usize, columns: &[Column]) -> TableData {
    let rows = records
        .iter()
        .take(n)
        .map(|r| columns.iter().map(|c| c.cell(r)).collect())
        .collect();
    TableData {
        columns: columns.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(startup: &str, amount: Option<f64>, day: u32) -> FundingRecord {
        FundingRecord {
            date: NaiveDate::from_ymd_opt(2019, 7, day).unwrap(),
            month: 7,
            year: 2019,
            startup: startup.to_string(),
            vertical: Some("SaaS".to_string()),
            city: None,
            round: Some("Series A".to_string()),
            investors: "X, Y".to_string(),
            amount,
        }
    }

    #[test]
    fn head_takes_first_n_in_dataset_order() {
        let rows = vec![rec("A", Some(1.0), 1), rec("B", Some(2.0), 2), rec("C", None, 3)];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let table = head_records(&refs, 2, &[Column::Date, Column::Startup]);
        assert_eq!(table.headers(), vec!["date", "startup"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["2019-07-01".to_string(), "A".to_string()],
                vec!["2019-07-02".to_string(), "B".to_string()],
            ]
        );
    }

    #[test]
    fn undisclosed_amount_renders_as_word() {
        let rows = vec![rec("A", None, 1)];
        let refs: Vec<&FundingRecord> = rows.iter().collect();

        let table = head_records(&refs, 5, &[Column::Startup, Column::Amount]);
        assert_eq!(table.rows[0][1], "undisclosed");
    }

    #[test]
    fn empty_subset_projects_to_empty_table() {
        let table = head_records(&[], 5, &[Column::Startup]);
        assert!(table.is_empty());
        assert_eq!(table.headers(), vec!["startup"]);
    }
}
