//! Command implementations.
//!
//! Each command module exposes an `execute` function taking its parsed
//! arguments.

pub mod adapt;
pub mod routes;

use edgepack::{AdapterConfig, ConfigDiscovery, RuleList, StagedBuild};

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

pub use adapt::execute as adapt_execute;
pub use routes::execute as routes_execute;

/// Load the adapter configuration and apply rule flags on top.
pub(crate) fn load_config(project: &ProjectArgs) -> Result<AdapterConfig> {
    let discovery = ConfigDiscovery::new(&project.root);
    let mut config = match &project.config {
        Some(path) => discovery.load_from(path)?,
        None => discovery.load()?,
    };

    if !project.include.is_empty() {
        config.routes.include = Some(RuleList::Rules(project.include.clone()));
    }
    if !project.exclude.is_empty() {
        config.routes.exclude = Some(RuleList::Rules(project.exclude.clone()));
    }

    Ok(config)
}

pub(crate) fn open_build(project: &ProjectArgs) -> Result<StagedBuild> {
    if !project.build.is_dir() {
        return Err(CliError::BuildNotFound(project.build.clone()));
    }
    Ok(StagedBuild::open(&project.build)?)
}
