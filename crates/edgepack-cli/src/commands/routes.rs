//! Routes command: print the `_routes.json` for a build.
//!
//! Nothing is written. The asset list comes from the build's client directory,
//! exactly as `adapt` would copy it.

use edgepack::BuildArtifacts;
use edgepack::routes::{RuleContext, generate_routes};

use crate::cli::RoutesArgs;
use crate::commands::{load_config, open_build};
use crate::error::Result;
use crate::ui;

pub fn execute(args: RoutesArgs) -> Result<()> {
    let config = load_config(&args.project)?;
    let build = open_build(&args.project)?.with_log(ui::UiLog);

    let assets = build.client_files()?;
    let app_path = build.app_path();
    let ctx = RuleContext::new(&app_path, build.app_dir(), &assets, build.prerendered());

    let outcome = generate_routes(&config.routes, &ctx, build.log())?;
    tracing::debug!(
        rules = outcome.document.rule_count(),
        dropped = outcome.dropped,
        "Resolved routes"
    );

    println!("{}", outcome.document.to_json()?);
    Ok(())
}
