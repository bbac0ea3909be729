//! Ratatui-based terminal UI.
//!
//! The TUI renders the three dashboard pages (overall analysis, per-startup,
//! per-investor) with a searchable entity list, metric tiles, tables, bar
//! charts, and a Plotters year-series chart.
//!
//! The dataset is loaded once before the terminal enters raw mode and never
//! mutated afterwards; every key press that changes the selection reruns the
//! same view pipeline the CLI subcommands use.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Terminal,
};

use crate::agg::{AggregationResult, TableData};
use crate::app::pipeline::{self, PageRequest};
use crate::cli::ViewArgs;
use crate::domain::{DashboardConfig, Page, YearSeries};
use crate::error::AppError;
use crate::io::ingest::Dataset;
use crate::view::View;

mod plotters_chart;

use plotters_chart::YearSeriesChart;

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    // Resolve the CSV (possibly via the interactive picker) and load the
    // dataset before touching the terminal, so prompts and load errors
    // print normally.
    let config = crate::app::dashboard_config_from_args(&args)?;
    let dataset = crate::io::ingest::load_dataset(&config.csv_path)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dataset: Dataset,
    config: DashboardConfig,
    page: Page,
    startups: Vec<String>,
    investors: Vec<String>,
    /// Position within the *filtered* entity list of the current page.
    selected: usize,
    search: String,
    searching: bool,
    view: Option<View>,
    status: String,
}

impl App {
    fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let rows = dataset.rows();
        let startups = crate::agg::distinct_startups(&rows);
        let investors = crate::agg::distinct_investors(&rows);
        drop(rows);

        let mut app = Self {
            status: format!(
                "Loaded {} rows ({} startups, {} investors).",
                dataset.rows_used,
                startups.len(),
                investors.len()
            ),
            dataset,
            config,
            page: Page::Overall,
            startups,
            investors,
            selected: 0,
            search: String::new(),
            searching: false,
            view: None,
        };
        app.rebuild_view();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.searching {
            return self.handle_search_edit(code);
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab => self.switch_page(self.page.next()),
            KeyCode::BackTab => self.switch_page(self.page.prev()),
            KeyCode::Char('1') => self.switch_page(Page::Overall),
            KeyCode::Char('2') => self.switch_page(Page::Startup),
            KeyCode::Char('3') => self.switch_page(Page::Investor),
            KeyCode::Up => {
                if self.page.needs_entity() && self.selected > 0 {
                    self.selected -= 1;
                    self.rebuild_view();
                }
            }
            KeyCode::Down => {
                let last = self.filtered_names().len().saturating_sub(1);
                if self.page.needs_entity() && self.selected < last {
                    self.selected += 1;
                    self.rebuild_view();
                }
            }
            KeyCode::Enter => self.rebuild_view(),
            KeyCode::Char('/') => {
                if self.page.needs_entity() {
                    self.searching = true;
                    self.status =
                        "Searching (type to filter, Enter to apply, Esc to clear).".to_string();
                }
            }
            KeyCode::Char('t') => {
                if self.page == Page::Overall {
                    self.config.series = self.config.series.toggled();
                    self.rebuild_view();
                    self.status = format!("series: {}", self.config.series.display_name());
                }
            }
            KeyCode::Char('m') => {
                self.config.investor_match = self.config.investor_match.toggled();
                if self.page == Page::Investor {
                    self.rebuild_view();
                }
                self.status = format!(
                    "investor matching: {}",
                    self.config.investor_match.display_name()
                );
            }
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(&self.dataset, &self.config) {
                    Ok(path) => {
                        self.status = format!("Wrote debug bundle: {}", path.display());
                    }
                    Err(err) => {
                        self.status = format!("Debug write failed: {err}");
                    }
                }
            }
            KeyCode::Char('e') => self.export_view(),
            _ => {}
        }

        Ok(false)
    }

    fn handle_search_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.searching = false;
                self.search.clear();
                self.selected = 0;
                self.rebuild_view();
                self.status = "Search cleared.".to_string();
            }
            KeyCode::Enter => {
                self.searching = false;
                self.selected = 0;
                self.rebuild_view();
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.selected = 0;
            }
            KeyCode::Char(c) => {
                self.search.push(c);
                self.selected = 0;
            }
            _ => {}
        }
        Ok(false)
    }

    fn switch_page(&mut self, page: Page) {
        self.page = page;
        self.search.clear();
        self.searching = false;
        self.selected = 0;
        self.rebuild_view();
        self.status = format!("page: {}", page.display_name());
    }

    fn export_view(&mut self) {
        let Some(view) = &self.view else {
            self.status = "No view to export.".to_string();
            return;
        };
        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = PathBuf::from(format!("fundlens_view_{ts}.json"));
        match crate::io::view::write_view_json(&path, view, &self.config.csv_path) {
            Ok(()) => self.status = format!("Wrote view JSON: {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    /// The current page's entity list, filtered by the search string.
    fn filtered_names(&self) -> Vec<&String> {
        let names = match self.page {
            Page::Overall => return Vec::new(),
            Page::Startup => &self.startups,
            Page::Investor => &self.investors,
        };
        if self.search.is_empty() {
            return names.iter().collect();
        }
        let needle = self.search.to_lowercase();
        names
            .iter()
            .filter(|n| n.to_lowercase().contains(&needle))
            .collect()
    }

    fn current_entity(&self) -> Option<String> {
        self.filtered_names().get(self.selected).map(|n| (*n).clone())
    }

    fn rebuild_view(&mut self) {
        let entity = self.current_entity();
        if self.page.needs_entity() && entity.is_none() {
            self.view = None;
            self.status = "No matching entities.".to_string();
            return;
        }

        let request = PageRequest {
            page: self.page,
            entity,
        };
        match pipeline::build_view(&self.dataset, &request, &self.config) {
            Ok(view) => self.view = Some(view),
            Err(err) => self.status = format!("{err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("fundlens", Style::default().fg(Color::Cyan)),
            Span::raw(" — startup funding analysis"),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "{} | rows: {} | startups: {} | undisclosed: {} | match: {}",
                self.config.csv_path.display(),
                self.dataset.rows_used,
                self.dataset.stats.n_startups,
                self.dataset.stats.n_undisclosed,
                self.config.investor_match.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let mut tabs: Vec<Span> = Vec::new();
        for (idx, page) in Page::ALL.iter().enumerate() {
            let label = format!(" {} {} ", idx + 1, page.display_name());
            if *page == self.page {
                tabs.push(Span::styled(
                    label,
                    Style::default().fg(Color::Black).bg(Color::White),
                ));
            } else {
                tabs.push(Span::styled(label, Style::default().fg(Color::Gray)));
            }
            tabs.push(Span::raw(" "));
        }
        lines.push(Line::from(tabs));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.page {
            Page::Overall => self.draw_overall(frame, area),
            Page::Startup | Page::Investor => {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(34), Constraint::Min(0)])
                    .split(area);
                self.draw_entity_list(frame, chunks[0]);
                self.draw_detail(frame, chunks[1]);
            }
        }
    }

    fn draw_overall(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(view) = &self.view else {
            self.draw_placeholder(frame, area, "Waiting for data...");
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        self.draw_metric_tiles(frame, chunks[0], view);
        self.draw_year_chart(frame, chunks[1], view);
    }

    fn draw_metric_tiles(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &View) {
        let Some(metrics) = view.metrics() else {
            return;
        };
        if metrics.is_empty() {
            return;
        }

        let share = (100 / metrics.len().max(1)) as u16;
        let constraints: Vec<Constraint> =
            metrics.iter().map(|_| Constraint::Percentage(share)).collect();
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (metric, tile) in metrics.iter().zip(tiles.iter()) {
            let value = crate::report::format_metric_value(&metric.value);
            let p = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .block(
                Block::default()
                    .title(metric.label.as_str())
                    .borders(Borders::ALL),
            );
            frame.render_widget(p, *tile);
        }
    }

    fn draw_entity_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let names = self.filtered_names();

        let kind = match self.page {
            Page::Startup => "Startups",
            _ => "Investors",
        };
        let title = if self.searching || !self.search.is_empty() {
            format!("{kind} ({}) /{}", names.len(), self.search)
        } else {
            format!("{kind} ({})", names.len())
        };

        let items: Vec<ListItem> = names
            .iter()
            .map(|n| ListItem::new(n.as_str()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        if !names.is_empty() {
            state.select(Some(self.selected.min(names.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(view) = &self.view else {
            self.draw_placeholder(frame, area, "Select an entity (↑/↓, Enter).");
            return;
        };

        let has_metrics = view.metrics().is_some();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(if has_metrics { 5 } else { 0 }),
                Constraint::Length(10),
                Constraint::Min(0),
            ])
            .split(area);

        if has_metrics {
            self.draw_metric_tiles(frame, chunks[0], view);
        }
        self.draw_table(frame, chunks[1], view);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        self.draw_bar_chart(frame, bottom[0], view);
        self.draw_year_chart(frame, bottom[1], view);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &View) {
        let Some((title, data)) = view.first_table() else {
            return;
        };

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        if data.is_empty() {
            let p = Paragraph::new("(no data)")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        let widths = table_widths(data);
        let header = Row::new(
            data.headers()
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        );
        let rows = data
            .rows
            .iter()
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));

        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_bar_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &View) {
        let Some((title, data)) = view.categorical_items().into_iter().next() else {
            return;
        };

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        if data.is_empty() {
            let p = Paragraph::new("(no data)")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        // BarChart wants integer heights; amounts in crores round cleanly.
        let entries: Vec<(String, u64)> = data
            .iter()
            .map(|(k, v)| (truncate_label(k, 10), v.round().max(0.0) as u64))
            .collect();
        let bars: Vec<(&str, u64)> = entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();

        let chart = BarChart::default()
            .block(block)
            .data(&bars[..])
            .bar_width(11)
            .bar_gap(1);
        frame.render_widget(chart, area);
    }

    fn draw_year_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &View) {
        let title = view
            .first_line()
            .map(|(t, _)| t.to_string())
            .unwrap_or_else(|| "Over the years".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = view.first_line().and_then(|(_, data)| year_points(data));
        let Some((points, x_bounds, y_bounds)) = series else {
            let p = Paragraph::new("(no data)").style(Style::default().fg(Color::Yellow));
            frame.render_widget(p, inner);
            return;
        };

        let y_label = match (self.page, self.config.series) {
            (Page::Overall, YearSeries::Startups) => "startups".to_string(),
            _ => "amount (Cr)".to_string(),
        };

        let widget = YearSeriesChart {
            line: &points,
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label,
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_placeholder(&self, frame: &mut ratatui::Frame<'_>, area: Rect, message: &str) {
        let p = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "Tab/1-3 page  ↑/↓ select  Enter load  / search  t series  m match  d debug  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    format!("{v:.0}")
}

/// Even column widths for a table widget.
fn table_widths(data: &TableData) -> Vec<Constraint> {
    let n = data.columns.len().max(1) as u16;
    data.columns
        .iter()
        .map(|_| Constraint::Percentage(100 / n))
        .collect()
}

/// Build Plotters-ready points and padded bounds from a year series.
///
/// Returns `None` when the series is empty or a key fails to parse as a
/// year (the renderer falls back to a "no data" hint).
fn year_points(data: &AggregationResult) -> Option<(Vec<(f64, f64)>, [f64; 2], [f64; 2])> {
    if data.is_empty() {
        return None;
    }

    let mut points = Vec::with_capacity(data.len());
    for (key, value) in data.iter() {
        let x: f64 = key.parse().ok()?;
        points.push((x, value));
    }

    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }

    // A single year still deserves a drawable range.
    if x1 - x0 < 1.0 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let pad = ((y1 - y0).abs() * 0.05).max(1e-12);
    Some((points, [x0, x1], [y0 - pad, y1 + pad]))
}

fn truncate_label(s: &str, max: usize) -> String {
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

    fn series(entries: &[(&str, f64)]) -> AggregationResult {
        AggregationResult::from_entries(
            entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn year_points_parses_and_pads_bounds() {
        let data = series(&[("2019", 10.0), ("2021", 30.0)]);
        let (points, x_bounds, y_bounds) = year_points(&data).unwrap();
        assert_eq!(points, vec![(2019.0, 10.0), (2021.0, 30.0)]);
        assert_eq!(x_bounds, [2019.0, 2021.0]);
        assert!(y_bounds[0] < 10.0 && y_bounds[1] > 30.0);
    }

    #[test]
    fn year_points_widens_single_year() {
        let data = series(&[("2020", 5.0)]);
        let (_, x_bounds, y_bounds) = year_points(&data).unwrap();
        assert!(x_bounds[1] - x_bounds[0] >= 1.0);
        assert!(y_bounds[1] > y_bounds[0]);
    }

    #[test]
    fn year_points_rejects_non_year_keys() {
        let data = series(&[("FinTech", 5.0)]);
        assert!(year_points(&data).is_none());
        assert!(year_points(&AggregationResult::default()).is_none());
    }

    #[test]
    fn labels_truncate_for_bar_charts() {
        assert_eq!(truncate_label("Short", 10), "Short");
        assert_eq!(truncate_label("A very long investor", 10), "A very lo.");
    }
}
