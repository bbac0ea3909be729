//! Command-line parsing for the funding-analysis dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the aggregation/view code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::YearSeries;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fundlens", version, about = "Startup Funding Analysis (CSV-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the overall-analysis view (metrics + year series).
    Overall(ViewArgs),
    /// Print the view for one startup.
    Startup(EntityArgs),
    /// Print the view for one investor.
    Investor(EntityArgs),
    /// Print an entity selection list (useful for scripting).
    List(ListArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying view pipeline as the print
    /// subcommands, but renders results in a terminal UI using Ratatui.
    Tui(ViewArgs),
}

/// Common options for loading the dataset and assembling views.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Funding-events CSV (columns: date, startup, vertical, city, round,
    /// investors, amount). Prompts for a file when omitted.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Match investor names by raw substring containment instead of
    /// delimiter-aware token equality (compatibility mode; overmatches
    /// names that are substrings of other names).
    #[arg(long)]
    pub loose_match: bool,

    /// Year series shown on the overall page.
    #[arg(long, value_enum, default_value_t = YearSeries::Amount)]
    pub series: YearSeries,

    /// Entries in "biggest investments" rankings.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Entries in co-occurring-investor rankings.
    #[arg(long, default_value_t = 10)]
    pub similar: usize,

    /// Rows in "recent investments" tables.
    #[arg(long, default_value_t = 5)]
    pub recent: usize,

    /// Export the view's aggregation results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the assembled view (all widgets) to JSON.
    #[arg(long = "export-view")]
    pub export_view: Option<PathBuf>,
}

/// Options for per-entity views.
#[derive(Debug, Parser)]
pub struct EntityArgs {
    /// Startup or investor name, exactly as it appears in the dataset
    /// (see `fundlens list`).
    pub name: String,

    #[command(flatten)]
    pub common: ViewArgs,
}

/// Options for `fundlens list`.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Which selection list to print.
    #[arg(value_enum)]
    pub target: ListTarget,

    #[command(flatten)]
    pub common: ViewArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    /// Distinct startup names, sorted.
    Startups,
    /// Distinct investor names (split from the investors field), sorted.
    Investors,
}
