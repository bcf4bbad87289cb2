//! Server manifest module written to the scratch directory.
//!
//! The worker entry imports `manifest` (the server's routing and handler
//! metadata) and `prerendered` (every prerendered path, redirects included)
//! from this module.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const MANIFEST_FILE: &str = "manifest.js";

/// Render the module source.
pub fn render_manifest_module(manifest: &str, prerendered: &[String]) -> Result<String> {
    let paths = serde_json::to_string(prerendered)?;
    Ok(format!(
        "export const manifest = {};\n\nexport const prerendered = new Set({});\n",
        manifest.trim(),
        paths
    ))
}

/// Write `<scratch>/manifest.js` and return its path.
pub fn write_manifest_module(
    scratch: &Path,
    manifest: &str,
    prerendered: &[String],
) -> Result<PathBuf> {
    let path = scratch.join(MANIFEST_FILE);
    let source = render_manifest_module(manifest, prerendered)?;
    std::fs::write(&path, source).map_err(|e| Error::io_at(&path, e))?;
    Ok(path)
}
