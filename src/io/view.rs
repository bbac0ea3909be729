//! Write view JSON files.
//!
//! View JSON is the "portable" representation of an assembled page: every
//! widget with its aggregation result, plus enough metadata to know where
//! the numbers came from. Useful for notebooks or diffing two runs.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::view::View;

/// Envelope for an exported view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewFile {
    pub tool: String,
    /// The CSV the view was computed from.
    pub source: String,
    pub view: View,
}

/// Write a view JSON file.
pub fn write_view_json(path: &Path, view: &View, source: &Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create view JSON '{}': {e}", path.display()),
        )
    })?;

    let doc = ViewFile {
        tool: "fundlens".to_string(),
        source: source.display().to_string(),
        view: view.clone(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write view JSON: {e}")))?;

    Ok(())
}
