use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use path_clean::PathClean;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, ResolveOptions,
    SourceMapType,
};
use rolldown_common::Output;
use rolldown_plugin::__inner::SharedPluginable;

use super::plugin::{ENTRY_SPECIFIER, EdgeRuntimePlugin};
use super::{BundleRequest, BundleSummary, WorkerBundler};
use crate::paths;
use crate::{Error, Result};

/// [`WorkerBundler`] backed by rolldown.
#[derive(Debug, Clone, Default)]
pub struct RolldownBundler;

impl RolldownBundler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkerBundler for RolldownBundler {
    async fn bundle(&self, request: &BundleRequest) -> Result<BundleSummary> {
        let entry = paths::absolute(&request.entry)?;
        let outfile = paths::absolute(&request.outfile)?;
        let out_dir = outfile
            .parent()
            .ok_or_else(|| Error::Bundle(format!("no parent for {}", outfile.display())))?
            .to_path_buf();
        let name = outfile
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Bundle(format!("no file name in {}", outfile.display())))?;
        let cwd = match &request.cwd {
            Some(cwd) => paths::absolute(cwd)?,
            None => std::env::current_dir()?,
        };

        let plugin = EdgeRuntimePlugin::new(entry.clone(), request);
        let copied = plugin.copied_files();
        let plugins: Vec<SharedPluginable> = vec![Arc::new(plugin)];

        let options = BundlerOptions {
            input: Some(vec![InputItem {
                name: Some(name),
                import: ENTRY_SPECIFIER.to_string(),
            }]),
            cwd: Some(cwd.clone()),
            format: Some(OutputFormat::Esm),
            platform: Some(Platform::Browser),
            // lazy route imports in the server manifest must not split chunks
            inline_dynamic_imports: Some(true),
            sourcemap: request.sourcemap.then_some(SourceMapType::File),
            resolve: Some(resolve_options(&cwd, &request.conditions)),
            ..Default::default()
        };

        tracing::debug!(entry = %entry.display(), outfile = %outfile.display(), "Bundling worker");

        let mut bundler = BundlerBuilder::default()
            .with_options(options)
            .with_plugins(plugins)
            .build()
            .map_err(|e| Error::Bundle(format!("{e:?}")))?;

        let output = bundler
            .generate()
            .await
            .map_err(|e| Error::Bundle(format!("{e:?}")))?;

        fs::create_dir_all(&out_dir).map_err(|e| Error::io_at(&out_dir, e))?;

        let mut summary = BundleSummary {
            outfile: outfile.clone(),
            ..Default::default()
        };

        for item in &output.assets {
            let (filename, content) = match item {
                Output::Chunk(chunk) => (chunk.filename.as_str(), chunk.code.as_bytes()),
                Output::Asset(asset) => (asset.filename.as_str(), asset.source.as_bytes()),
            };
            let target = output_path(&out_dir, filename)?;
            write_file(&target, content)?;

            if filename.ends_with(".map") {
                summary.sourcemap = Some(target);
            }
        }

        for (source, file_name) in copied.lock().iter() {
            let target = output_path(&out_dir, file_name)?;
            fs::copy(source, &target).map_err(|e| Error::io_at(source, e))?;
            summary.copied.push(target);
        }

        tracing::info!(
            outfile = %outfile.display(),
            copied = summary.copied.len(),
            "Worker bundled"
        );

        Ok(summary)
    }
}

fn resolve_options(cwd: &Path, conditions: &[String]) -> ResolveOptions {
    let modules = cwd
        .ancestors()
        .map(|dir| dir.join("node_modules").to_string_lossy().into_owned())
        .chain(std::iter::once("node_modules".to_string()))
        .collect();

    ResolveOptions {
        main_fields: Some(vec![
            "browser".to_string(),
            "module".to_string(),
            "main".to_string(),
        ]),
        condition_names: Some(conditions.to_vec()),
        extensions: Some(vec![
            ".js".to_string(),
            ".mjs".to_string(),
            ".json".to_string(),
        ]),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

/// Join an emitted file name onto the output directory, refusing names that
/// would land outside it.
fn output_path(dir: &Path, filename: &str) -> Result<PathBuf> {
    let target = dir.join(filename).clean();
    if !target.starts_with(dir) {
        return Err(Error::Bundle(format!(
            "output file '{}' escapes {}",
            filename,
            dir.display()
        )));
    }
    Ok(target)
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
    }
    fs::write(path, content).map_err(|e| Error::io_at(path, e))
}
