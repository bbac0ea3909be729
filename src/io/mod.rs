//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - aggregation-result CSV export (`export`)
//! - view JSON export (`view`)

pub mod export;
pub mod ingest;
pub mod view;

pub use export::*;
pub use ingest::*;
pub use view::*;
