//! Adapt command: package a build for Cloudflare Pages.

use edgepack::{Adapter, RolldownBundler};

use crate::cli::AdaptArgs;
use crate::commands::{load_config, open_build};
use crate::error::Result;
use crate::ui;

/// Execute the adapt command.
///
/// # Steps
///
/// 1. Load `edgepack.toml` (or the `package.json` key) and apply flags
/// 2. Open the build descriptor
/// 3. Run the adapter, which validates the routes before touching disk and
///    reports rule overflow through [`ui::UiLog`]
pub async fn execute(args: AdaptArgs) -> Result<()> {
    let mut config = load_config(&args.project)?;
    if let Some(out_dir) = args.out_dir {
        config.output.dir = out_dir;
    }
    if let Some(scratch) = args.scratch_dir {
        config.output.scratch = scratch;
    }

    let build = open_build(&args.project)?.with_log(ui::UiLog);
    ui::info(&format!(
        "Adapting {} for Cloudflare Pages",
        args.project.build.display()
    ));

    let adapter = Adapter::new(config, RolldownBundler::new()).with_root(&args.project.root);
    let report = adapter.adapt(&build).await?;

    ui::success(&format!(
        "_routes.json: {} include, {} exclude rules",
        report.routes.include.len(),
        report.routes.exclude.len()
    ));
    if !report.worker.copied.is_empty() {
        ui::info(&format!(
            "Copied {} binary modules next to the worker",
            report.worker.copied.len()
        ));
    }
    ui::success(&format!("Worker bundled to {}", report.worker.outfile.display()));

    Ok(())
}
