//! Text renderers for the run summary and views.

use crate::agg::TableData;
use crate::domain::DashboardConfig;
use crate::io::ingest::Dataset;
use crate::view::{Metric, MetricValue, View, ViewItem};

/// How many row errors to spell out in the summary before eliding.
const MAX_ROW_ERRORS_SHOWN: usize = 3;

/// Format the run summary (file, row counts, dataset stats, row errors).
pub fn format_run_summary(dataset: &Dataset, config: &DashboardConfig) -> String {
    let mut out = String::new();

    out.push_str("=== fundlens - Startup Funding Analysis ===\n");
    out.push_str(&format!("File: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: read={} used={} | startups: {} | undisclosed amounts: {}\n",
        dataset.rows_read,
        dataset.rows_used,
        dataset.stats.n_startups,
        dataset.stats.n_undisclosed,
    ));
    out.push_str(&format!(
        "Dates: {} .. {}\n",
        dataset.stats.date_min, dataset.stats.date_max
    ));
    out.push_str(&format!(
        "Investor matching: {}\n",
        config.investor_match.display_name()
    ));

    if !dataset.row_errors.is_empty() {
        out.push_str(&format!(
            "\nSkipped {} row(s):\n",
            dataset.row_errors.len()
        ));
        for err in dataset.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
            match &err.startup {
                Some(startup) => out.push_str(&format!(
                    "  line {}: {} (startup: {})\n",
                    err.line, err.message, startup
                )),
                None => out.push_str(&format!("  line {}: {}\n", err.line, err.message)),
            }
        }
        if dataset.row_errors.len() > MAX_ROW_ERRORS_SHOWN {
            out.push_str(&format!(
                "  ... and {} more\n",
                dataset.row_errors.len() - MAX_ROW_ERRORS_SHOWN
            ));
        }
    }

    out
}

/// Render an assembled view as terminal text.
pub fn format_view(view: &View) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", view.title));

    for item in &view.items {
        out.push('\n');
        match item {
            ViewItem::Metrics(metrics) => out.push_str(&format_metrics(metrics)),
            ViewItem::Bar { title, data } | ViewItem::Share { title, data } => {
                out.push_str(&format!("{title}:\n"));
                if data.is_empty() {
                    out.push_str("  (no data)\n");
                } else {
                    out.push_str(&crate::plot::render_bar_chart(data, 72));
                }
            }
            ViewItem::Line { title, data } => {
                out.push_str(&format!("{title}:\n"));
                if data.is_empty() {
                    out.push_str("  (no data)\n");
                } else {
                    out.push_str(&crate::plot::render_line_chart(data, 72, 12));
                }
            }
            ViewItem::Table { title, data } => {
                out.push_str(&format!("{title}:\n"));
                if data.is_empty() {
                    out.push_str("  (no data)\n");
                } else {
                    out.push_str(&format_table(data));
                }
            }
        }
    }

    out
}

/// Render a metric's value. Currency formatting lives here, not in the
/// aggregation engine.
pub fn format_metric_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Amount(v) => format_amount(*v),
        MetricValue::Count(n) => n.to_string(),
        MetricValue::NoData => "-".to_string(),
    }
}

/// Amounts are stored in crores; the unit is display-only.
pub fn format_amount(v: f64) -> String {
    format!("₹{v:.2} Cr")
}

fn format_metrics(metrics: &[Metric]) -> String {
    let mut out = String::new();
    for m in metrics {
        out.push_str(&format!(
            "{:<30} {}\n",
            m.label,
            format_metric_value(&m.value)
        ));
    }
    out
}

fn format_table(data: &TableData) -> String {
    let headers = data.headers();

    // Column widths adapt to content, capped so one long name cannot blow
    // up the whole table.
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &data.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count().min(28));
            }
        }
    }

    let mut out = String::new();

    let mut header_line = String::new();
    let mut rule_line = String::new();
    for (i, h) in headers.iter().enumerate() {
        header_line.push_str(&format!("{:<width$}  ", h, width = widths[i]));
        rule_line.push_str(&format!("{:-<width$}  ", "", width = widths[i]));
    }
    out.push_str(header_line.trim_end());
    out.push('\n');
    out.push_str(rule_line.trim_end());
    out.push('\n');

    for row in &data.rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(&format!(
                "{:<width$}  ",
                truncate(cell, widths[i]),
                width = widths[i]
            ));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::head_records;
    use crate::domain::{Column, FundingRecord};
    use chrono::NaiveDate;

    #[test]
    fn metric_values_format_with_units() {
        assert_eq!(format_metric_value(&MetricValue::Amount(12.5)), "₹12.50 Cr");
        assert_eq!(format_metric_value(&MetricValue::Count(7)), "7");
        assert_eq!(format_metric_value(&MetricValue::NoData), "-");
    }

    #[test]
    fn table_formatting_aligns_and_truncates() {
        let record = FundingRecord {
            date: NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
            month: 1,
            year: 2020,
            startup: "A startup with an exceptionally long name".to_string(),
            vertical: None,
            city: None,
            round: Some("Seed".to_string()),
            investors: "X".to_string(),
            amount: Some(1.0),
        };
        let refs = vec![&record];
        let table = head_records(&refs, 1, &[Column::Startup, Column::Round]);

        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("startup"));
        assert!(lines[1].starts_with("--"));
        // Capped at 28 chars (27 + '.').
        assert!(lines[2].contains('.'));
        assert!(!lines[2].contains("exceptionally long name"));
    }

    #[test]
    fn empty_widgets_render_no_data() {
        let view = View {
            title: "T".to_string(),
            items: vec![ViewItem::Bar {
                title: "Empty".to_string(),
                data: Default::default(),
            }],
        };
        let text = format_view(&view);
        assert!(text.contains("(no data)"));
    }
}
