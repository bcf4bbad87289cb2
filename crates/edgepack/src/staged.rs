//! [`BuildArtifacts`] over a build directory on disk.
//!
//! The framework's build step leaves an `edgepack.build.json` descriptor next
//! to its output:
//!
//! ```json
//! {
//!   "appDir": "_app",
//!   "base": "",
//!   "client": "client",
//!   "server": "server",
//!   "prerendered": { "dir": "prerendered", "paths": ["/"], "redirects": [] },
//!   "manifest": "manifest.js",
//!   "fallback": "fallback.html"
//! }
//! ```
//!
//! Only `appDir` is required. Paths are relative to the build directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::artifacts::{BuildArtifacts, BuildLog, Prerendered, TracingLog};
use crate::paths;
use crate::{Error, Result};

pub const DESCRIPTOR_FILE: &str = "edgepack.build.json";

/// Placeholder in the manifest template replaced with the scratch-to-server
/// relative path.
pub const RELATIVE_PATH_PLACEHOLDER: &str = "__RELATIVE_PATH__";

const DEFAULT_FALLBACK: &str = "<!doctype html>\n\
<html lang=\"en\">\n\
\t<head>\n\
\t\t<meta charset=\"utf-8\" />\n\
\t\t<title>Not Found</title>\n\
\t</head>\n\
\t<body>\n\
\t\t<h1>404</h1>\n\
\t\t<p>Not Found</p>\n\
\t</body>\n\
</html>\n";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    app_dir: String,
    #[serde(default)]
    base: String,
    #[serde(default = "default_client")]
    client: PathBuf,
    #[serde(default = "default_server")]
    server: PathBuf,
    #[serde(default)]
    prerendered: PrerenderedDescriptor,
    #[serde(default = "default_manifest")]
    manifest: PathBuf,
    #[serde(default)]
    fallback: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct PrerenderedDescriptor {
    #[serde(default = "default_prerendered")]
    dir: PathBuf,
    #[serde(flatten)]
    routes: Prerendered,
}

impl Default for PrerenderedDescriptor {
    fn default() -> Self {
        Self {
            dir: default_prerendered(),
            routes: Prerendered::default(),
        }
    }
}

fn default_client() -> PathBuf {
    PathBuf::from("client")
}

fn default_server() -> PathBuf {
    PathBuf::from("server")
}

fn default_prerendered() -> PathBuf {
    PathBuf::from("prerendered")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("manifest.js")
}

/// A finished build read from its descriptor.
pub struct StagedBuild {
    root: PathBuf,
    app_dir: String,
    base: String,
    client_dir: PathBuf,
    server_dir: PathBuf,
    prerendered_dir: PathBuf,
    prerendered: Prerendered,
    manifest: PathBuf,
    fallback: Option<PathBuf>,
    log: Box<dyn BuildLog>,
}

impl fmt::Debug for StagedBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedBuild")
            .field("root", &self.root)
            .field("app_dir", &self.app_dir)
            .field("base", &self.base)
            .field("prerendered", &self.prerendered)
            .finish_non_exhaustive()
    }
}

impl StagedBuild {
    /// Read `<dir>/edgepack.build.json`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let root = paths::absolute(dir.as_ref())?;
        let descriptor_path = root.join(DESCRIPTOR_FILE);

        let content = fs::read_to_string(&descriptor_path).map_err(|e| {
            Error::Artifacts(format!(
                "cannot read {}: {}",
                descriptor_path.display(),
                e
            ))
        })?;
        let descriptor: Descriptor = serde_json::from_str(&content).map_err(|e| {
            Error::Artifacts(format!("invalid {}: {}", descriptor_path.display(), e))
        })?;

        if !descriptor.base.is_empty() && !descriptor.base.starts_with('/') {
            return Err(Error::Artifacts(format!(
                "base path '{}' must be empty or start with '/'",
                descriptor.base
            )));
        }

        tracing::debug!(
            root = %root.display(),
            app_dir = %descriptor.app_dir,
            base = %descriptor.base,
            "Opened staged build"
        );

        Ok(Self {
            app_dir: descriptor.app_dir,
            base: descriptor.base.trim_end_matches('/').to_string(),
            client_dir: root.join(descriptor.client),
            server_dir: root.join(descriptor.server),
            prerendered_dir: root.join(descriptor.prerendered.dir),
            prerendered: descriptor.prerendered.routes,
            manifest: root.join(descriptor.manifest),
            fallback: descriptor.fallback.map(|fallback| root.join(fallback)),
            log: Box::new(TracingLog),
            root,
        })
    }

    /// Send operator messages (rule overflow warnings, the final summary)
    /// to `log` instead of `tracing`.
    pub fn with_log(mut self, log: impl BuildLog + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Client asset paths without copying anything.
    pub fn client_files(&self) -> Result<Vec<String>> {
        list_tree(&self.client_dir)
    }
}

impl BuildArtifacts for StagedBuild {
    fn app_dir(&self) -> &str {
        &self.app_dir
    }

    fn base_path(&self) -> &str {
        &self.base
    }

    fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    fn prerendered(&self) -> &Prerendered {
        &self.prerendered
    }

    fn generate_fallback(&self, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
        }
        match &self.fallback {
            Some(fallback) => fs::copy(fallback, dest)
                .map(|_| ())
                .map_err(|e| Error::io_at(fallback, e)),
            None => fs::write(dest, DEFAULT_FALLBACK).map_err(|e| Error::io_at(dest, e)),
        }
    }

    fn write_client(&self, dest: &Path) -> Result<Vec<String>> {
        copy_tree(&self.client_dir, dest)
    }

    fn write_prerendered(&self, dest: &Path) -> Result<Vec<String>> {
        copy_tree(&self.prerendered_dir, dest)
    }

    fn generate_manifest(&self, relative_path: &str) -> Result<String> {
        let template = fs::read_to_string(&self.manifest).map_err(|e| {
            Error::Artifacts(format!(
                "cannot read server manifest {}: {}",
                self.manifest.display(),
                e
            ))
        })?;
        Ok(template.replace(RELATIVE_PATH_PLACEHOLDER, relative_path))
    }

    fn log(&self) -> &dyn BuildLog {
        self.log.as_ref()
    }
}

/// Files under `src` as sorted `/`-separated relative paths. A missing
/// directory has no files.
fn list_tree(src: &Path) -> Result<Vec<String>> {
    Ok(walk_files(src)?
        .into_iter()
        .map(|(_, relative)| relative)
        .collect())
}

/// Copy every file under `src` into `dest`, keeping the layout.
fn copy_tree(src: &Path, dest: &Path) -> Result<Vec<String>> {
    let files = walk_files(src)?;
    let mut written = Vec::with_capacity(files.len());

    for (source, relative) in files {
        let target = dest.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
        }
        fs::copy(&source, &target).map_err(|e| Error::io_at(&source, e))?;
        written.push(relative);
    }

    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        count = written.len(),
        "Copied files"
    );

    Ok(written)
}

fn walk_files(src: &Path) -> Result<Vec<(PathBuf, String)>> {
    if !src.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(src)
            .map(paths::to_posix)
            .map_err(|e| Error::Artifacts(e.to_string()))?;
        files.push((entry.into_path(), relative));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn descriptor_defaults() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(DESCRIPTOR_FILE), r#"{"appDir": "_app"}"#);

        let build = StagedBuild::open(dir.path()).unwrap();

        assert_eq!(build.app_dir(), "_app");
        assert_eq!(build.base_path(), "");
        assert_eq!(build.server_dir(), dir.path().join("server"));
        assert!(build.prerendered().paths.is_empty());
    }

    #[test]
    fn missing_descriptor_is_an_artifacts_error() {
        let dir = TempDir::new().unwrap();
        let err = StagedBuild::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Artifacts(_)));
    }

    #[test]
    fn relative_base_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join(DESCRIPTOR_FILE),
            r#"{"appDir": "_app", "base": "docs"}"#,
        );
        assert!(StagedBuild::open(dir.path()).is_err());
    }

    #[test]
    fn client_files_are_sorted_posix_paths() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(DESCRIPTOR_FILE), r#"{"appDir": "_app"}"#);
        write(&dir.path().join("client/robots.txt"), "");
        write(&dir.path().join("client/_app/immutable/start.js"), "");
        write(&dir.path().join("client/favicon.png"), "");

        let build = StagedBuild::open(dir.path()).unwrap();

        assert_eq!(
            build.client_files().unwrap(),
            vec!["_app/immutable/start.js", "favicon.png", "robots.txt"]
        );
    }

    #[test]
    fn missing_prerendered_directory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(DESCRIPTOR_FILE), r#"{"appDir": "_app"}"#);
        let out = TempDir::new().unwrap();

        let build = StagedBuild::open(dir.path()).unwrap();
        assert!(build.write_prerendered(out.path()).unwrap().is_empty());
    }

    #[test]
    fn manifest_placeholder_is_replaced() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(DESCRIPTOR_FILE), r#"{"appDir": "_app"}"#);
        write(
            &dir.path().join("manifest.js"),
            "{ nodes: [() => import('__RELATIVE_PATH__/nodes/0.js')] }",
        );

        let build = StagedBuild::open(dir.path()).unwrap();
        let manifest = build.generate_manifest("../build/server").unwrap();

        assert_eq!(
            manifest,
            "{ nodes: [() => import('../build/server/nodes/0.js')] }"
        );
    }

    #[test]
    fn default_fallback_page() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(DESCRIPTOR_FILE), r#"{"appDir": "_app"}"#);
        let out = TempDir::new().unwrap();
        let dest = out.path().join("404.html");

        StagedBuild::open(dir.path())
            .unwrap()
            .generate_fallback(&dest)
            .unwrap();

        assert!(fs::read_to_string(dest).unwrap().contains("<h1>404</h1>"));
    }

    #[test]
    fn prerendered_redirects_from_descriptor() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join(DESCRIPTOR_FILE),
            r#"{"appDir": "_app", "prerendered": {"paths": ["/", "/old"], "redirects": ["/old"]}}"#,
        );

        let build = StagedBuild::open(dir.path()).unwrap();
        let pages: Vec<_> = build.prerendered().pages().collect();

        assert_eq!(pages, vec!["/"]);
    }
}
