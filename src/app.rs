//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the CSV path (flag or interactive picker)
//! - loads the dataset
//! - assembles and prints views
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, EntityArgs, ListArgs, ListTarget, ViewArgs};
use crate::domain::{DashboardConfig, InvestorMatch, Page};
use crate::error::AppError;

pub mod pipeline;

use pipeline::PageRequest;

/// Entry point for the `fundlens` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fundlens` and `fundlens -f funding.csv` to behave like
    // `fundlens tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Overall(args) => handle_page(Page::Overall, None, args),
        Command::Startup(args) => handle_entity_page(Page::Startup, args),
        Command::Investor(args) => handle_entity_page(Page::Investor, args),
        Command::List(args) => handle_list(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_entity_page(page: Page, args: EntityArgs) -> Result<(), AppError> {
    handle_page(page, Some(args.name), args.common)
}

fn handle_page(page: Page, entity: Option<String>, args: ViewArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args)?;
    let dataset = crate::io::ingest::load_dataset(&config.csv_path)?;

    let request = PageRequest { page, entity };
    let view = pipeline::build_view(&dataset, &request, &config)?;

    println!("{}", crate::report::format_run_summary(&dataset, &config));
    println!("{}", crate::report::format_view(&view));

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &view)?;
    }
    if let Some(path) = &config.export_view {
        crate::io::view::write_view_json(path, &view, &config.csv_path)?;
    }

    Ok(())
}

fn handle_list(args: ListArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.common)?;
    let dataset = crate::io::ingest::load_dataset(&config.csv_path)?;
    let rows = dataset.rows();

    let names = match args.target {
        ListTarget::Startups => crate::agg::distinct_startups(&rows),
        ListTarget::Investors => crate::agg::distinct_investors(&rows),
    };
    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Resolve CLI flags into a `DashboardConfig`, prompting for a CSV when no
/// `-f` was given.
pub fn dashboard_config_from_args(args: &ViewArgs) -> Result<DashboardConfig, AppError> {
    let csv_path = match &args.file {
        Some(path) => crate::cli::picker::validate_csv_path(path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };

    Ok(DashboardConfig {
        csv_path,
        investor_match: if args.loose_match {
            InvestorMatch::Contains
        } else {
            InvestorMatch::Exact
        },
        series: args.series,
        top_n: args.top,
        similar_n: args.similar,
        recent_n: args.recent,
        export_results: args.export.clone(),
        export_view: args.export_view.clone(),
    })
}

/// Rewrite argv so `fundlens` defaults to `fundlens tui`.
///
/// Rules:
/// - `fundlens`                       -> `fundlens tui`
/// - `fundlens -f funding.csv ...`    -> `fundlens tui -f funding.csv ...`
/// - `fundlens --help/--version/-h`   -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "overall" | "startup" | "investor" | "list" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["fundlens"])), argv(&["fundlens", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["fundlens", "-f", "funding.csv"])),
            argv(&["fundlens", "tui", "-f", "funding.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["fundlens", "overall"])),
            argv(&["fundlens", "overall"])
        );
        assert_eq!(
            rewrite_args(argv(&["fundlens", "--help"])),
            argv(&["fundlens", "--help"])
        );
    }
}
