//! Process-level error type.
//!
//! Exit codes used throughout the tool:
//! - `2`: input/usage errors (missing file or column, bad flags, bad entity)
//! - `3`: no-data errors (zero valid rows after normalization)
//! - `4`: runtime failures (terminal init/draw, export or bundle I/O)
//!
//! Empty aggregation results are deliberately NOT errors; they render as a
//! "no data" state.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
