//! Adapter configuration and file-based discovery.
//!
//! Sources, lowest priority first: built-in defaults, `edgepack.toml` (or the
//! `edgepack` key of `package.json`), then `EDGEPACK_*` environment variables
//! with `__` separating nested keys (`EDGEPACK_OUTPUT__DIR=dist`).

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routes::RoutesConfig;

pub const CONFIG_FILE: &str = "edgepack.toml";
pub const PACKAGE_JSON_KEY: &str = "edgepack";
pub const ENV_PREFIX: &str = "EDGEPACK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be an array of path patterns")]
    InvalidConfigShape { field: &'static str },

    #[error("routes.include must contain at least one route")]
    EmptyIncludeList,

    #[error("routes.include must contain {max} or fewer routes (found {count})")]
    TooManyIncludeRules { count: usize, max: usize },

    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Load(String),
}

/// Top-level adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(default)]
    pub routes: RoutesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the deployment and the scratch files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Deployment root handed to Cloudflare Pages.
    #[serde(default = "default_out_dir")]
    pub dir: PathBuf,

    /// Scratch directory for the generated manifest and worker entry.
    #[serde(default = "default_scratch_dir")]
    pub scratch: PathBuf,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".edgepack/cloudflare")
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(".edgepack/cloudflare-tmp")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            scratch: default_scratch_dir(),
        }
    }
}

impl AdapterConfig {
    /// Create from a JSON value (for programmatic configuration).
    ///
    /// ```
    /// use edgepack::AdapterConfig;
    /// use serde_json::json;
    ///
    /// let config = AdapterConfig::from_value(json!({
    ///     "routes": { "exclude": ["<build>", "/static/*"] }
    /// })).unwrap();
    /// assert!(config.routes.include.is_none());
    /// ```
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Anchor relative output paths at `root`.
    pub fn with_root(mut self, root: &Path) -> Self {
        if self.output.dir.is_relative() {
            self.output.dir = root.join(&self.output.dir);
        }
        if self.output.scratch.is_relative() {
            self.output.scratch = root.join(&self.output.scratch);
        }
        self
    }
}

/// Finds and loads the adapter configuration for a project.
///
/// ```no_run
/// use edgepack::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory.
    ///
    /// Searches `edgepack.toml` first, then a `package.json` with an
    /// `edgepack` field.
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        let content = std::fs::read_to_string(&pkg_path).ok()?;
        let parsed: serde_json::Value = serde_json::from_str(&content).ok()?;
        match parsed.get(PACKAGE_JSON_KEY) {
            Some(value) if !value.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load defaults, the discovered file (if any) and the environment.
    pub fn load(&self) -> Result<AdapterConfig, ConfigError> {
        self.extract(self.find().as_deref())
    }

    /// Load with an explicit config file, which must exist.
    pub fn load_from(&self, path: &Path) -> Result<AdapterConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        self.extract(Some(path))
    }

    fn extract(&self, file: Option<&Path>) -> Result<AdapterConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(AdapterConfig::default()));

        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "loading adapter config");
            figment = match path.file_name().and_then(|name| name.to_str()) {
                Some("package.json") => {
                    figment.merge(Figment::from(Json::file(path)).focus(PACKAGE_JSON_KEY))
                }
                _ if path.extension().is_some_and(|ext| ext == "json") => {
                    figment.merge(Json::file(path))
                }
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AdapterConfig = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        Ok(config.with_root(&self.root))
    }
}
