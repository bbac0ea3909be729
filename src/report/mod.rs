//! Reporting utilities: formatted terminal output for assembled views.
//!
//! We keep formatting code in one place so:
//! - the aggregation/view code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

mod format;

pub use format::*;
