//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two chart shapes cover every aggregation result:
//! - `render_bar_chart`: horizontal bars for categorical series
//! - `render_line_chart`: a character grid for year series

use crate::agg::AggregationResult;

/// Longest label shown before truncation in bar charts.
const MAX_LABEL_WIDTH: usize = 24;

/// Render a categorical result as horizontal bars.
///
/// `width` is the full line width: label column + bar + value suffix.
pub fn render_bar_chart(data: &AggregationResult, width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let label_width = data
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    // Leave room for " |" separators and the value suffix.
    let bar_width = width.saturating_sub(label_width + 12).max(8);
    let max_value = data.max_value().unwrap_or(0.0);

    let mut out = String::new();
    for (key, value) in data.iter() {
        let bar_len = if max_value > 0.0 && value > 0.0 {
            let scaled = (value / max_value * bar_width as f64).round() as usize;
            scaled.clamp(1, bar_width)
        } else {
            0
        };

        out.push_str(&format!(
            "{:<label_width$} |{:<bar_width$} {:.2}\n",
            truncate(key, label_width),
            "█".repeat(bar_len),
            value,
        ));
    }

    out
}

/// Render a year series as a fixed-size character grid.
///
/// Keys are plotted left to right in result order; values are `o` markers
/// joined by `-` segments. The header states the value range so the grid
/// can stay unlabeled.
pub fn render_line_chart(data: &AggregationResult, width: usize, height: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let width = width.max(10);
    let height = height.max(5);

    let values: Vec<f64> = data.iter().map(|(_, v)| v).collect();
    let (y_min, y_max) = pad_range(
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        0.05,
    );

    let mut grid = vec![vec![' '; width]; height];

    // Segments first, so markers can overlay.
    let mut prev: Option<(usize, usize)> = None;
    for (i, &v) in values.iter().enumerate() {
        let x = map_x(i, values.len(), width);
        let y = map_y(v, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }
    for (i, &v) in values.iter().enumerate() {
        let x = map_x(i, values.len(), width);
        let y = map_y(v, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!("y=[{y_min:.2}, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    // X axis: first and last keys anchor the ends of the grid.
    let first = data.iter().next().map(|(k, _)| k.to_string()).unwrap_or_default();
    let last = data.iter().last().map(|(k, _)| k.to_string()).unwrap_or_default();
    if first == last {
        out.push_str(&format!("{first}\n"));
    } else {
        let gap = width.saturating_sub(first.chars().count() + last.chars().count());
        out.push_str(&format!("{first}{}{last}\n", " ".repeat(gap)));
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = index as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((v - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
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
