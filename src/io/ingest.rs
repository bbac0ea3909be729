//! CSV ingest and normalization.
//!
//! This module turns the funding-events CSV into a clean, typed `Dataset`
//! that is safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no aggregation logic here
//!
//! The dataset is loaded once at process start and treated as immutable
//! read-only state for the rest of the run; everything downstream borrows
//! it.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;

use crate::domain::FundingRecord;
use crate::error::AppError;

/// Columns that must be present in the header row. `vertical`, `city` and
/// `round` are optional: an absent column (or empty cell) loads as `None`.
const REQUIRED_COLUMNS: [&str; 4] = ["date", "startup", "investors", "amount"];

/// Summary stats about the rows actually loaded.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_records: usize,
    pub n_startups: usize,
    /// Rows whose amount was undisclosed/unparseable (kept, but excluded
    /// from sums and averages).
    pub n_undisclosed: usize,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub startup: Option<String>,
    pub message: String,
}

/// Ingest output: typed records + stats + row errors.
///
/// Owned by the entry point and passed by shared reference into every
/// request-handling call; nothing mutates it after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<FundingRecord>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl Dataset {
    /// Borrowed view of all records, in dataset order. This is the shape
    /// the aggregation engine consumes (the same shape filters return).
    pub fn rows(&self) -> Vec<&FundingRecord> {
        self.records.iter().collect()
    }
}

/// Load and normalize the funding CSV.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    load_dataset_from_reader(file)
}

/// Load from any reader (used by `load_dataset` and by tests).
pub fn load_dataset_from_reader(reader: impl std::io::Read) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    startup: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => records.push(row),
            Err((startup, message)) => row_errors.push(RowError {
                line,
                startup,
                message,
            }),
        }
    }

    let rows_used = records.len();
    let stats = compute_stats(&records).ok_or_else(|| {
        AppError::new(3, "No valid rows remain after normalization.")
    })?;

    Ok(Dataset {
        records,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿date"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }
    Ok(())
}

/// Parse one CSV row. The error side carries the startup name when we got
/// far enough to know it, for better row-level messages.
fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<FundingRecord, (Option<String>, String)> {
    let startup = get_optional(record, header_map, "startup")
        .map(str::to_string)
        .ok_or((None, "Missing `startup` value.".to_string()))?;

    let date_str = get_optional(record, header_map, "date")
        .ok_or((Some(startup.clone()), "Missing `date` value.".to_string()))?;
    let date = parse_date(date_str).map_err(|e| (Some(startup.clone()), e))?;

    let investors = get_optional(record, header_map, "investors")
        .unwrap_or("")
        .to_string();

    let amount = parse_amount(get_optional(record, header_map, "amount"));

    Ok(FundingRecord {
        date,
        month: date.month(),
        year: date.year(),
        startup,
        vertical: get_optional(record, header_map, "vertical").map(str::to_string),
        city: get_optional(record, header_map, "city").map(str::to_string),
        round: get_optional(record, header_map, "round").map(str::to_string),
        investors,
        amount,
    })
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // The dataset uses `DD/MM/YYYY`; we accept a small set of common
    // formats to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: DD/MM/YYYY, YYYY-MM-DD, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

/// Normalize an amount cell to a disclosed numeric value.
///
/// `None` covers the undisclosed markers and anything unparseable; callers
/// must exclude such rows from sums and averages rather than reading them
/// as zero. Thousands separators and a leading currency symbol are
/// stripped before parsing.
fn parse_amount(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let cleaned = s.trim().trim_start_matches('₹').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.to_ascii_lowercase().as_str() {
        "undisclosed" | "unknown" | "n/a" | "na" | "nan" => return None,
        _ => {}
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn compute_stats(records: &[FundingRecord]) -> Option<DatasetStats> {
    let first = records.first()?;
    let mut date_min = first.date;
    let mut date_max = first.date;
    let mut n_undisclosed = 0usize;
    let mut startups: HashSet<&str> = HashSet::new();

    for r in records {
        date_min = date_min.min(r.date);
        date_max = date_max.max(r.date);
        if r.amount.is_none() {
            n_undisclosed += 1;
        }
        startups.insert(r.startup.as_str());
    }

    Some(DatasetStats {
        n_records: records.len(),
        n_startups: startups.len(),
        n_undisclosed,
        date_min,
        date_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,startup,vertical,city,round,investors,amount
01/02/2020,Acme,FinTech,Bangalore,Seed,\"Alpha, Beta\",12.5
15/03/2020,Bolt,Logistics,Pune,Series A,Gamma,undisclosed
20/01/2021,Acme,FinTech,Bangalore,Series A,Alpha,\"1,000\"
";

    #[test]
    fn loads_and_derives_calendar_fields() {
        let dataset = load_dataset_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.rows_read, 3);
        assert_eq!(dataset.rows_used, 3);
        assert!(dataset.row_errors.is_empty());

        let first = &dataset.records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(first.month, 2);
        assert_eq!(first.year, 2020);
        assert_eq!(first.startup, "Acme");
        assert_eq!(first.amount, Some(12.5));
    }

    #[test]
    fn stats_count_undisclosed_and_startups() {
        let dataset = load_dataset_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.stats.n_records, 3);
        assert_eq!(dataset.stats.n_startups, 2);
        assert_eq!(dataset.stats.n_undisclosed, 1);
        assert_eq!(
            dataset.stats.date_min,
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()
        );
        assert_eq!(
            dataset.stats.date_max,
            NaiveDate::from_ymd_opt(2021, 1, 20).unwrap()
        );
    }

    #[test]
    fn thousands_separator_is_stripped() {
        let dataset = load_dataset_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.records[2].amount, Some(1000.0));
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "\
date,startup,vertical,city,round,investors,amount
not-a-date,Acme,FinTech,Bangalore,Seed,Alpha,10
05/05/2020,Bolt,Logistics,Pune,Seed,Beta,5
";
        let dataset = load_dataset_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.rows_read, 2);
        assert_eq!(dataset.rows_used, 1);
        assert_eq!(dataset.row_errors.len(), 1);
        assert_eq!(dataset.row_errors[0].line, 2);
        assert_eq!(dataset.row_errors[0].startup.as_deref(), Some("Acme"));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "date,startup,vertical\n01/01/2020,Acme,FinTech\n";
        let err = load_dataset_from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_valid_rows_is_fatal() {
        let csv = "date,startup,vertical,city,round,investors,amount\n";
        let err = load_dataset_from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn bom_on_first_header_is_tolerated() {
        let csv = "\u{feff}date,startup,vertical,city,round,investors,amount\n01/01/2020,Acme,,,,Alpha,1\n";
        let dataset = load_dataset_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.rows_used, 1);
        assert_eq!(dataset.records[0].vertical, None);
    }

    #[test]
    fn parse_amount_cases() {
        assert_eq!(parse_amount(Some("12.5")), Some(12.5));
        assert_eq!(parse_amount(Some("₹1,234.5")), Some(1234.5));
        assert_eq!(parse_amount(Some("undisclosed")), None);
        assert_eq!(parse_amount(Some("N/A")), None);
        assert_eq!(parse_amount(Some("")), None);
        assert_eq!(parse_amount(None), None);
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(parse_date("01/02/2020").unwrap(), expected);
        assert_eq!(parse_date("2020-02-01").unwrap(), expected);
        assert_eq!(parse_date("01-02-2020").unwrap(), expected);
        assert!(parse_date("02/30/2020").is_err());
    }
}
