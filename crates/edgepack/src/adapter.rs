//! Deployment packager.
//!
//! Turns a finished build into a Cloudflare Pages deployment directory:
//!
//! ```text
//! <out>/
//! ├── 404.html          fallback page (a prerendered 404.html wins)
//! ├── <base>/...        client assets and prerendered pages
//! ├── _routes.json      which requests reach the worker
//! ├── _headers          immutable-asset cache rules (appended)
//! ├── _worker.js        bundled worker
//! └── _worker.js.map
//! ```
//!
//! The run is strictly sequential. Configuration is validated before anything
//! is touched; both the output and the scratch directory are cleared at the
//! start, so reruns are safe.

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifacts::BuildArtifacts;
use crate::bundle::{BundleRequest, BundleSummary, WorkerBundler};
use crate::config::AdapterConfig;
use crate::headers::append_headers;
use crate::manifest::write_manifest_module;
use crate::paths;
use crate::routes::{RoutesDocument, RuleContext, generate_routes};
use crate::worker::{WORKER_FILE, write_worker_entry};
use crate::{Error, Result};

pub const ROUTES_FILE: &str = "_routes.json";
pub const FALLBACK_FILE: &str = "404.html";

/// What one adapter run produced.
#[derive(Debug, Clone)]
pub struct AdaptReport {
    pub out_dir: PathBuf,
    /// Client assets written, relative to `<out><base>`.
    pub assets: Vec<String>,
    /// Prerendered pages written, relative to `<out><base>`.
    pub prerendered: Vec<String>,
    pub routes: RoutesDocument,
    /// Exclude rules dropped to stay within the rule ceiling.
    pub dropped: usize,
    pub worker: BundleSummary,
}

/// Packages build artifacts for Cloudflare Pages.
#[derive(Debug)]
pub struct Adapter<B> {
    config: AdapterConfig,
    bundler: B,
    /// Directory bare imports are resolved from when bundling.
    root: Option<PathBuf>,
}

impl<B: WorkerBundler> Adapter<B> {
    pub fn new(config: AdapterConfig, bundler: B) -> Self {
        Self {
            config,
            bundler,
            root: None,
        }
    }

    /// Resolve the worker's bare imports from `root` instead of the current
    /// directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn bundler(&self) -> &B {
        &self.bundler
    }

    /// Run every packaging step against `artifacts`.
    pub async fn adapt(&self, artifacts: &dyn BuildArtifacts) -> Result<AdaptReport> {
        self.config.routes.validate()?;

        let out_dir = paths::absolute(&self.config.output.dir)?;
        let scratch = paths::absolute(&self.config.output.scratch)?;

        tracing::info!(out_dir = %out_dir.display(), "Adapting build for Cloudflare Pages");

        clear_dir(&out_dir)?;
        clear_dir(&scratch)?;

        artifacts.generate_fallback(&out_dir.join(FALLBACK_FILE))?;

        let dest_dir = base_dir(&out_dir, artifacts.base_path());
        let assets = artifacts.write_client(&dest_dir)?;
        let prerendered = artifacts.write_prerendered(&dest_dir)?;
        tracing::debug!(
            assets = assets.len(),
            prerendered = prerendered.len(),
            dest = %dest_dir.display(),
            "Wrote static files"
        );

        let server_dir = paths::absolute(artifacts.server_dir())?;
        let relative_path = paths::relative_posix(&scratch, &server_dir);
        let manifest = artifacts.generate_manifest(&relative_path)?;
        write_manifest_module(&scratch, &manifest, &artifacts.prerendered().paths)?;

        let app_path = artifacts.app_path();
        let ctx = RuleContext::new(
            &app_path,
            artifacts.app_dir(),
            &assets,
            artifacts.prerendered(),
        );
        let outcome = generate_routes(&self.config.routes, &ctx, artifacts.log())?;
        let routes_path = out_dir.join(ROUTES_FILE);
        fs::write(&routes_path, outcome.document.to_json()?)
            .map_err(|e| Error::io_at(&routes_path, e))?;
        tracing::debug!(
            include = outcome.document.include.len(),
            exclude = outcome.document.exclude.len(),
            "Wrote {}",
            ROUTES_FILE
        );

        append_headers(&out_dir, &app_path)?;

        let entry = write_worker_entry(&scratch, &relative_path)?;
        let mut request = BundleRequest::edge_worker(entry, out_dir.join(WORKER_FILE));
        if let Some(root) = &self.root {
            request = request.cwd(root);
        }
        let worker = self.bundler.bundle(&request).await?;

        artifacts.log().info(&format!(
            "Deployment ready in {} ({} assets, {} prerendered pages)",
            out_dir.display(),
            assets.len(),
            prerendered.len()
        ));

        Ok(AdaptReport {
            out_dir,
            assets,
            prerendered,
            routes: outcome.document,
            dropped: outcome.dropped,
            worker,
        })
    }
}

/// `<out><base>`, with `base` either empty or `/`-prefixed.
fn base_dir(out_dir: &Path, base: &str) -> PathBuf {
    let base = base.trim_matches('/');
    if base.is_empty() {
        out_dir.to_path_buf()
    } else {
        out_dir.join(base)
    }
}

/// Remove `dir` with everything in it, then recreate it empty.
fn clear_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(Error::Artifacts(format!(
                "output path exists but is not a directory: {}",
                dir.display()
            )));
        }
        fs::remove_dir_all(dir).map_err(|e| Error::io_at(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io_at(dir, e))
}
