//! Worker entry template.

use std::path::{Path, PathBuf};

use crate::manifest::MANIFEST_FILE;
use crate::{Error, Result};

pub const WORKER_FILE: &str = "_worker.js";

const TEMPLATE: &str = include_str!("../files/worker.js");

const SERVER_PLACEHOLDER: &str = "'SERVER'";
const MANIFEST_PLACEHOLDER: &str = "'MANIFEST'";

/// Fill the template with the server bundle and manifest module specifiers.
///
/// `server_relative` is the path from the scratch directory to the server
/// build directory.
pub fn render_worker_entry(server_relative: &str) -> String {
    let server = if server_relative.is_empty() {
        "./index.js".to_string()
    } else if server_relative.starts_with('.') {
        format!("{}/index.js", server_relative)
    } else {
        format!("./{}/index.js", server_relative)
    };

    TEMPLATE
        .replace(SERVER_PLACEHOLDER, &format!("'{}'", server))
        .replace(MANIFEST_PLACEHOLDER, &format!("'./{}'", MANIFEST_FILE))
}

/// Write `<scratch>/_worker.js` and return its path.
pub fn write_worker_entry(scratch: &Path, server_relative: &str) -> Result<PathBuf> {
    let path = scratch.join(WORKER_FILE);
    std::fs::write(&path, render_worker_entry(server_relative))
        .map_err(|e| Error::io_at(&path, e))?;
    Ok(path)
}
