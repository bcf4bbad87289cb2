//! # edgepack
//!
//! Repackages a finished web-application build for Cloudflare Pages.
//!
//! The adapter copies client assets and prerendered pages into the deployment
//! directory, writes the `_routes.json` rule document that decides which
//! requests reach the worker, appends immutable-asset cache headers, and
//! bundles the worker entrypoint with rolldown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use edgepack::{Adapter, AdapterConfig, RolldownBundler, StagedBuild};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let build = StagedBuild::open("build")?;
//! let adapter = Adapter::new(AdapterConfig::default(), RolldownBundler::new());
//!
//! let report = adapter.adapt(&build).await?;
//! println!("{} exclude rules", report.routes.exclude.len());
//! # Ok(()) }
//! ```
//!
//! ## Routing rules only
//!
//! ```
//! use edgepack::routes::{RoutesConfig, RuleContext, routes_document};
//! use edgepack::{Prerendered, TracingLog};
//!
//! let prerendered = Prerendered::default();
//! let assets = vec!["robots.txt".to_string()];
//! let ctx = RuleContext::new("_app", "_app", &assets, &prerendered);
//!
//! let doc = routes_document(&RoutesConfig::default(), &ctx, &TracingLog).unwrap();
//! assert_eq!(doc.exclude, vec!["/_app/*", "/robots.txt"]);
//! ```

pub mod adapter;
pub mod artifacts;
pub mod bundle;
pub mod config;
pub mod headers;
pub mod manifest;
pub mod paths;
pub mod routes;
pub mod staged;
pub mod worker;

pub use adapter::{AdaptReport, Adapter};
pub use artifacts::{BuildArtifacts, BuildLog, Prerendered, TracingLog};
pub use bundle::{BundleRequest, BundleSummary, Polyfill, RolldownBundler, WorkerBundler};
pub use config::{AdapterConfig, ConfigDiscovery, ConfigError, OutputConfig};
pub use routes::{RoutesConfig, RoutesDocument, RuleList, MAX_ROUTE_RULES};
pub use staged::StagedBuild;

/// Error types for edgepack operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid adapter configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The worker bundler failed.
    #[error("Worker bundling failed: {0}")]
    Bundle(String),

    /// The build artifacts are missing or malformed.
    #[error("Build artifacts error: {0}")]
    Artifacts(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization or parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for edgepack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the path that caused it.
    pub fn io_at(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::IoError {
            message: format!("{}: {}", path.display(), source),
            source,
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Config(ConfigError::InvalidConfigShape { .. }) => "INVALID_CONFIG_SHAPE",
            Error::Config(ConfigError::EmptyIncludeList) => "EMPTY_INCLUDE_LIST",
            Error::Config(ConfigError::TooManyIncludeRules { .. }) => "TOO_MANY_INCLUDE_RULES",
            Error::Config(_) => "INVALID_CONFIG",
            Error::Bundle(_) => "BUNDLE_ERROR",
            Error::Artifacts(_) => "BUILD_ARTIFACTS_ERROR",
            Error::Io(_) | Error::IoError { .. } => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(ConfigError::InvalidConfigShape { field }) => Some(Box::new(format!(
                "Set '{}' to a list of path patterns, e.g. [\"/*\"].",
                field
            ))),
            Error::Config(ConfigError::TooManyIncludeRules { max, .. }) => Some(Box::new(
                format!(
                    "Cloudflare Pages accepts at most {} rules. Use wildcards to merge include rules.",
                    max
                ),
            )),
            Error::Bundle(_) => Some(Box::new(
                "The worker entry could not be bundled. Check that the server build exists and its imports resolve.",
            )),
            Error::Artifacts(_) => Some(Box::new(
                "Run the framework build first and check edgepack.build.json.",
            )),
            _ => None,
        }
    }
}
