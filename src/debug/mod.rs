//! Debug bundle writer for inspecting the loaded dataset and every
//! aggregation at once.
//!
//! The bundle is a single markdown file under `debug/`, so a surprising
//! number on screen can be traced back to raw group sums offline.

use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::agg::{self, AggregationResult};
use crate::domain::{CategoryField, DashboardConfig};
use crate::error::AppError;
use crate::io::ingest::Dataset;

/// Rows shown per ranking table in the bundle.
const BUNDLE_TOP_N: usize = 10;

/// Row errors spelled out before eliding.
const BUNDLE_MAX_ROW_ERRORS: usize = 20;

pub fn write_debug_bundle(dataset: &Dataset, config: &DashboardConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    fs::create_dir_all(&dir)
        .map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("fundlens_debug_{ts}.md"));

    let rows = dataset.rows();
    let mut out = String::new();

    out.push_str("# fundlens debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- source: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "- rows: read={} used={} skipped={}\n",
        dataset.rows_read,
        dataset.rows_used,
        dataset.row_errors.len()
    ));
    out.push_str(&format!(
        "- startups: {} | undisclosed amounts: {}\n",
        dataset.stats.n_startups, dataset.stats.n_undisclosed
    ));
    out.push_str(&format!(
        "- dates: {} .. {}\n",
        dataset.stats.date_min, dataset.stats.date_max
    ));
    out.push_str(&format!(
        "- investor matching: {}\n",
        config.investor_match.display_name()
    ));

    if !dataset.row_errors.is_empty() {
        out.push_str("\n## Row errors\n");
        for err in dataset.row_errors.iter().take(BUNDLE_MAX_ROW_ERRORS) {
            out.push_str(&format!(
                "- line {}: {}{}\n",
                err.line,
                err.message,
                err.startup
                    .as_deref()
                    .map(|s| format!(" (startup: {s})"))
                    .unwrap_or_default()
            ));
        }
        if dataset.row_errors.len() > BUNDLE_MAX_ROW_ERRORS {
            out.push_str(&format!(
                "- ... and {} more\n",
                dataset.row_errors.len() - BUNDLE_MAX_ROW_ERRORS
            ));
        }
    }

    out.push_str("\n## Overall metrics\n");
    out.push_str("| metric | value |\n");
    out.push_str("| - | - |\n");
    out.push_str(&format!(
        "| total amount | {:.3} |\n",
        agg::total_amount(&rows)
    ));
    out.push_str(&format!(
        "| max single investment | {} |\n",
        agg::max_amount_record(&rows)
            .and_then(|r| r.amount)
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!(
        "| average funding per startup | {} |\n",
        agg::average_funding_per_startup(&rows)
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!(
        "| distinct startups | {} |\n",
        agg::count_distinct_startups(&rows)
    ));

    push_series(&mut out, "Amount by year", &agg::sum_by_year(&rows));
    push_series(
        &mut out,
        "Distinct startups by year",
        &agg::count_distinct_startups_by_year(&rows),
    );
    push_series(
        &mut out,
        "Top startups by amount",
        &agg::top_n_by_startup(&rows, BUNDLE_TOP_N),
    );
    push_series(
        &mut out,
        "Top investors by mentions",
        &agg::top_investor_cooccurrence(&rows, BUNDLE_TOP_N),
    );

    for field in [CategoryField::Vertical, CategoryField::Round, CategoryField::City] {
        push_series(
            &mut out,
            &format!("Amount by {}", field.display_name()),
            &agg::sum_by_category(&rows, field),
        );
    }

    fs::write(&path, out)
        .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn push_series(out: &mut String, title: &str, data: &AggregationResult) {
    out.push_str(&format!("\n## {title}\n"));
    if data.is_empty() {
        out.push_str("(no data)\n");
        return;
    }
    out.push_str("| key | value |\n");
    out.push_str("| - | - |\n");
    for (key, value) in data.iter() {
        out.push_str(&format!("| {key} | {value:.3} |\n"));
    }
}
