//! CLI error type.
//!
//! Library failures keep their [`miette::Diagnostic`] codes and help text
//! when reported; everything else becomes a plain report.

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Errors from the adapter library.
    #[error(transparent)]
    Edgepack(#[from] edgepack::Error),

    /// The build directory does not exist.
    #[error("Build directory not found: {}", .0.display())]
    BuildNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<edgepack::ConfigError> for CliError {
    fn from(err: edgepack::ConfigError) -> Self {
        CliError::Edgepack(err.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Convert a [`CliError`] into a miette report for `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Edgepack(e) => Report::new(e),
        CliError::BuildNotFound(path) => miette::miette!(
            help = "Run the framework build first, or pass the build directory as an argument.",
            "Build directory not found: {}",
            path.display()
        ),
        CliError::Json(e) => miette::miette!("JSON error: {}", e),
    }
}
