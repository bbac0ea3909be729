//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the funding event record (`FundingRecord`)
//! - selection enums (`Page`, `EntityField`, `InvestorMatch`, `CategoryField`, ...)
//! - the per-run configuration (`DashboardConfig`)

pub mod types;

pub use types::*;
