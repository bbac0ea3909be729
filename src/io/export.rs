//! Export a view's aggregation results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one `section,key,value` row per aggregation entry. Tabular
//! widgets are not flattened here; `--export-view` (JSON) carries the full
//! view including tables.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::view::{MetricValue, View, ViewItem};

/// Write the view's metrics and aggregation series to a CSV file.
pub fn write_results_csv(path: &Path, view: &View) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "section,key,value")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for item in &view.items {
        match item {
            ViewItem::Metrics(metrics) => {
                for m in metrics {
                    let value = match &m.value {
                        MetricValue::Amount(v) => format!("{v:.4}"),
                        MetricValue::Count(n) => n.to_string(),
                        MetricValue::NoData => String::new(),
                    };
                    write_row(&mut file, "metrics", &m.label, &value)?;
                }
            }
            ViewItem::Bar { title, data }
            | ViewItem::Share { title, data }
            | ViewItem::Line { title, data } => {
                for (key, value) in data.iter() {
                    write_row(&mut file, title, key, &format!("{value:.4}"))?;
                }
            }
            ViewItem::Table { .. } => {}
        }
    }

    Ok(())
}

fn write_row(file: &mut File, section: &str, key: &str, value: &str) -> Result<(), AppError> {
    writeln!(file, "{},{},{value}", csv_field(section), csv_field(key))
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))
}

/// Quote a field when it contains CSV-significant characters. Startup
/// names in the wild do contain commas.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_field_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
