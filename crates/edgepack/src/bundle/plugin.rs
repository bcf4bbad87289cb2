//! Rolldown plugin that adapts server code to the Workers runtime.
//!
//! It owns three concerns:
//! - the bundle entry, a virtual module that loads the polyfills before
//!   re-exporting the worker, plus the polyfill modules themselves
//! - runtime-provided namespaces (`cloudflare:`, `node:`), left as imports
//! - binary imports such as `.wasm`, kept external and recorded so the
//!   bundler can copy them next to the output

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use path_clean::PathClean;
use rolldown_common::{ModuleType, ResolvedExternal};
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

use super::{BundleRequest, Polyfill};

/// Specifier used as the bundle input.
pub const ENTRY_SPECIFIER: &str = "edgepack:worker-entry";
/// Specifier of the polyfill module.
pub const POLYFILL_SPECIFIER: &str = "edgepack:polyfills";
/// Specifier of the embedded `Buffer` implementation.
pub const BUFFER_SPECIFIER: &str = "edgepack:buffer";

const ENTRY_ID: &str = "\0edgepack:worker-entry";
const POLYFILL_ID: &str = "\0edgepack:polyfills";
const BUFFER_ID: &str = "\0edgepack:buffer";

const BUFFER_SHIM: &str = include_str!("../../files/buffer.js");

/// Binary files imported by the bundle, as (source, output file name).
pub type CopiedFiles = Arc<Mutex<Vec<(PathBuf, String)>>>;

#[derive(Debug, Clone)]
pub struct EdgeRuntimePlugin {
    entry: PathBuf,
    external_prefixes: Vec<String>,
    polyfills: Vec<Polyfill>,
    copy_extensions: Vec<String>,
    copied: CopiedFiles,
}

enum Resolution {
    Virtual(&'static str),
    External(String),
}

impl EdgeRuntimePlugin {
    /// `entry` must be absolute; it is imported from a virtual module.
    pub fn new(entry: PathBuf, request: &BundleRequest) -> Self {
        Self {
            entry,
            external_prefixes: request.external_prefixes.clone(),
            polyfills: request.polyfills.clone(),
            copy_extensions: request.copy_extensions.clone(),
            copied: Arc::default(),
        }
    }

    /// Shared handle to the binary imports seen so far.
    pub fn copied_files(&self) -> CopiedFiles {
        Arc::clone(&self.copied)
    }

    fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<Resolution> {
        match specifier {
            ENTRY_SPECIFIER => return Some(Resolution::Virtual(ENTRY_ID)),
            POLYFILL_SPECIFIER => return Some(Resolution::Virtual(POLYFILL_ID)),
            BUFFER_SPECIFIER => return Some(Resolution::Virtual(BUFFER_ID)),
            _ => {}
        }

        if self
            .external_prefixes
            .iter()
            .any(|prefix| specifier.starts_with(prefix.as_str()))
        {
            return Some(Resolution::External(specifier.to_string()));
        }

        if self
            .copy_extensions
            .iter()
            .any(|ext| specifier.ends_with(ext.as_str()))
        {
            let source = resolve_file(specifier, importer)?;
            let file_name = source.file_name()?.to_string_lossy().into_owned();
            tracing::debug!(source = %source.display(), "Copying binary import");

            let mut copied = self.copied.lock();
            if !copied.iter().any(|(path, _)| path == &source) {
                copied.push((source, file_name.clone()));
            }
            return Some(Resolution::External(format!("./{file_name}")));
        }

        None
    }

    fn virtual_source(&self, id: &str) -> Option<String> {
        match id {
            ENTRY_ID => {
                let entry = self.entry.to_string_lossy();
                let quoted = serde_json::to_string(entry.as_ref()).ok()?;
                Some(format!(
                    "import \"{POLYFILL_SPECIFIER}\";\nexport {{ default }} from {quoted};\n"
                ))
            }
            POLYFILL_ID => Some(
                self.polyfills
                    .iter()
                    .map(Polyfill::source)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            BUFFER_ID => Some(BUFFER_SHIM.to_string()),
            _ => None,
        }
    }
}

fn resolve_file(specifier: &str, importer: Option<&str>) -> Option<PathBuf> {
    let path = Path::new(specifier);
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else if specifier.starts_with('.') {
        Path::new(importer?).parent()?.join(path)
    } else {
        return None;
    };
    let resolved = resolved.clean();
    resolved.is_file().then_some(resolved)
}

impl Plugin for EdgeRuntimePlugin {
    fn name(&self) -> Cow<'static, str> {
        "edgepack-edge-runtime".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs<'_>,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let output = self
            .resolve(args.specifier, args.importer)
            .map(|resolution| match resolution {
                Resolution::Virtual(id) => HookResolveIdOutput {
                    id: id.to_string().into(),
                    external: Some(ResolvedExternal::Bool(false)),
                    ..Default::default()
                },
                Resolution::External(id) => HookResolveIdOutput {
                    id: id.into(),
                    external: Some(ResolvedExternal::Bool(true)),
                    ..Default::default()
                },
            });

        async move { Ok(output) }
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let output = self.virtual_source(args.id).map(|code| HookLoadOutput {
            code: code.into(),
            module_type: Some(ModuleType::Js),
            ..Default::default()
        });

        async move { Ok(output) }
    }
}
