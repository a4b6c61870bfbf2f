//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),
    #[error("input '{field}': {message}")]
    BadInput { field: String, message: String },
    #[error("no fixture JSON files found in {}", .0.display())]
    NoFixtures(PathBuf),
}

impl HarnessError {
    pub(crate) fn bad_input(field: &str, message: impl Into<String>) -> Self {
        Self::BadInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
