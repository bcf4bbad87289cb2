//! The finished framework build, as seen by the adapter.
//!
//! The adapter never builds anything itself. It consumes a [`BuildArtifacts`]
//! provider that knows where the client assets, the server bundle and the
//! prerendered pages live, and that can copy them into the deployment
//! directory.

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Operator-facing log sink used by the adapter.
///
/// Warnings sent here are non-fatal: the deployment continues.
pub trait BuildLog: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// [`BuildLog`] that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl BuildLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Prerendered route paths and the subset of them that are redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerendered {
    /// Prerendered paths, in the order the framework produced them.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Paths that only answer with a redirect.
    #[serde(default)]
    pub redirects: FxHashSet<String>,
}

impl Prerendered {
    pub fn new<P, R>(paths: P, redirects: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            redirects: redirects.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_redirect(&self, path: &str) -> bool {
        self.redirects.contains(path)
    }

    /// Prerendered paths that serve a real page, in production order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .map(String::as_str)
            .filter(|path| !self.is_redirect(path))
    }
}

/// Join the base path and the app directory into the app path.
///
/// `("", "_app")` gives `_app`, `("/docs", "_app")` gives `docs/_app`.
pub fn app_path(base: &str, app_dir: &str) -> String {
    let base = base.strip_prefix('/').unwrap_or(base);
    if base.is_empty() {
        app_dir.to_string()
    } else {
        format!("{}/{}", base, app_dir)
    }
}

/// Provider contract for a finished framework build.
pub trait BuildArtifacts: Send + Sync {
    /// Name of the framework's internal asset directory (e.g. `_app`).
    fn app_dir(&self) -> &str;

    /// Base path the application is mounted under (`""` or `/docs`).
    fn base_path(&self) -> &str;

    /// Base path and app directory joined, without a leading slash.
    fn app_path(&self) -> String {
        app_path(self.base_path(), self.app_dir())
    }

    /// Directory holding the server bundle (`index.js` lives here).
    fn server_dir(&self) -> &Path;

    /// Prerendered paths and redirects.
    fn prerendered(&self) -> &Prerendered;

    /// Write the generic fallback error page to `dest`.
    fn generate_fallback(&self, dest: &Path) -> Result<()>;

    /// Copy the client assets under `dest`, returning the written paths
    /// relative to `dest` with `/` separators.
    fn write_client(&self, dest: &Path) -> Result<Vec<String>>;

    /// Copy the prerendered pages under `dest`.
    fn write_prerendered(&self, dest: &Path) -> Result<Vec<String>>;

    /// Render the server manifest object literal. `relative_path` points from
    /// the scratch directory to [`server_dir`](Self::server_dir).
    fn generate_manifest(&self, relative_path: &str) -> Result<String>;

    /// Log sink for operator-facing messages.
    fn log(&self) -> &dyn BuildLog;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_path_without_base() {
        assert_eq!(app_path("", "_app"), "_app");
    }

    #[test]
    fn app_path_with_base() {
        assert_eq!(app_path("/docs", "_app"), "docs/_app");
    }

    #[test]
    fn pages_skip_redirects_and_keep_order() {
        let prerendered = Prerendered::new(["/c", "/a", "/b"], ["/a"]);
        let pages: Vec<_> = prerendered.pages().collect();
        assert_eq!(pages, vec!["/c", "/b"]);
    }

    #[test]
    fn prerendered_deserializes_with_defaults() {
        let prerendered: Prerendered = serde_json::from_str(r#"{"paths": ["/"]}"#).unwrap();
        assert_eq!(prerendered.paths, vec!["/"]);
        assert!(prerendered.redirects.is_empty());
    }
}
