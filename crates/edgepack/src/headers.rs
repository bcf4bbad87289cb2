//! Cache headers for the framework's immutable assets.
//!
//! The block is appended to `_headers` so that rules shipped with the
//! application's static files survive. Appending twice duplicates the block;
//! every run starts from a cleared output directory, so that only happens
//! when called directly.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::{Error, Result};

pub const HEADERS_FILE: &str = "_headers";

const BLOCK_START: &str = "# === START AUTOGENERATED EDGEPACK IMMUTABLE HEADERS ===";
const BLOCK_END: &str = "# === END AUTOGENERATED EDGEPACK IMMUTABLE HEADERS ===";

/// Render the header block for `app_path` (e.g. `_app` or `docs/_app`).
///
/// Everything under the app path is `noindex` and uncached; the nested
/// `immutable/` directory resets that and is cached for a year.
pub fn generate_headers(app_path: &str) -> String {
    format!(
        "\n{BLOCK_START}\n\
         /{app_path}/*\n  X-Robots-Tag: noindex\n  Cache-Control: no-cache\n\
         /{app_path}/immutable/*\n  ! Cache-Control\n  Cache-Control: public, immutable, max-age=31536000\n\
         {BLOCK_END}"
    )
}

/// Append the header block to `<dir>/_headers`, creating it if needed.
pub fn append_headers(dir: &Path, app_path: &str) -> Result<()> {
    let path = dir.join(HEADERS_FILE);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| Error::io_at(&path, e))?;

    file.write_all(generate_headers(app_path).as_bytes())
        .map_err(|e| Error::io_at(&path, e))
}
