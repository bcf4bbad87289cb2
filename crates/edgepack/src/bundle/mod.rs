//! Worker bundling.
//!
//! The adapter hands the rendered worker entry to a [`WorkerBundler`] and
//! expects exactly one self-contained ES module back, plus a linked source
//! map. [`RolldownBundler`] is the built-in implementation.

mod plugin;
mod rolldown_bundler;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::Result;

pub use self::plugin::EdgeRuntimePlugin;
pub use self::rolldown_bundler::RolldownBundler;

/// Export conditions for the Workers runtime, most specific first.
pub const EDGE_CONDITIONS: &[&str] = &["worker", "browser"];

/// Import namespaces the Workers runtime provides itself.
pub const EDGE_EXTERNAL_PREFIXES: &[&str] = &["cloudflare:", "node:"];

/// Binary assets that are copied next to the worker instead of inlined.
pub const COPY_EXTENSIONS: &[&str] = &[".wasm"];

/// Globals that server code may assume but the Workers runtime lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polyfill {
    /// `globalThis.Buffer`, from the bundled `edgepack:buffer` shim. Nothing
    /// is resolved from the project's `node_modules`.
    Buffer,
    /// `globalThis.process`, a minimal environment handle.
    Process,
}

impl Polyfill {
    pub fn global_name(&self) -> &'static str {
        match self {
            Polyfill::Buffer => "Buffer",
            Polyfill::Process => "process",
        }
    }

    /// Module source that installs the global when it is missing.
    pub fn source(&self) -> &'static str {
        match self {
            Polyfill::Buffer => {
                "import { Buffer as __edgepack_Buffer } from \"edgepack:buffer\";\n\
                 if (typeof globalThis.Buffer === \"undefined\") {\n\
                 \tglobalThis.Buffer = __edgepack_Buffer;\n\
                 }\n"
            }
            Polyfill::Process => {
                "if (typeof globalThis.process === \"undefined\") {\n\
                 \tglobalThis.process = {\n\
                 \t\tenv: {},\n\
                 \t\targv: [],\n\
                 \t\tversions: {},\n\
                 \t\tplatform: \"browser\",\n\
                 \t\tcwd: () => \"/\",\n\
                 \t\tnextTick: (fn, ...args) => queueMicrotask(() => fn(...args))\n\
                 \t};\n\
                 }\n"
            }
        }
    }
}

/// Fixed bundling configuration for one worker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Entry module (the rendered worker template).
    pub entry: PathBuf,
    /// Output module path; the source map lands beside it.
    pub outfile: PathBuf,
    /// Resolution root. Defaults to the current directory.
    pub cwd: Option<PathBuf>,
    pub conditions: Vec<String>,
    /// Specifiers with these prefixes stay unresolved imports.
    pub external_prefixes: Vec<String>,
    pub polyfills: Vec<Polyfill>,
    /// Imports with these extensions are copied as opaque files.
    pub copy_extensions: Vec<String>,
    pub sourcemap: bool,
}

impl BundleRequest {
    /// The Cloudflare Workers configuration.
    pub fn edge_worker(entry: impl Into<PathBuf>, outfile: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            outfile: outfile.into(),
            cwd: None,
            conditions: to_strings(EDGE_CONDITIONS),
            external_prefixes: to_strings(EDGE_EXTERNAL_PREFIXES),
            polyfills: vec![Polyfill::Buffer, Polyfill::Process],
            copy_extensions: to_strings(COPY_EXTENSIONS),
            sourcemap: true,
        }
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn is_external(&self, specifier: &str) -> bool {
        self.external_prefixes
            .iter()
            .any(|prefix| specifier.starts_with(prefix.as_str()))
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// What the bundler wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSummary {
    pub outfile: PathBuf,
    pub sourcemap: Option<PathBuf>,
    /// Binary assets copied next to the output.
    pub copied: Vec<PathBuf>,
}

/// Bundles a worker entry into a single module.
#[async_trait]
pub trait WorkerBundler: Send + Sync {
    async fn bundle(&self, request: &BundleRequest) -> Result<BundleSummary>;
}
