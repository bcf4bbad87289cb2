//! Command-line interface definition.
//!
//! - `edgepack adapt` - package a build into a Cloudflare Pages deployment
//! - `edgepack routes` - print the `_routes.json` a deployment would get

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// edgepack - deploy framework builds to Cloudflare Pages
#[derive(Parser, Debug)]
#[command(
    name = "edgepack",
    version,
    about = "Package framework builds for Cloudflare Pages",
    long_about = "edgepack turns a finished server-rendered build into a Cloudflare Pages\n\
                  deployment: static assets, prerendered pages, _routes.json, _headers\n\
                  and a bundled _worker.js."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package a build for deployment
    ///
    /// Clears the output directory, copies client assets and prerendered
    /// pages, writes _routes.json and _headers, and bundles the worker.
    Adapt(AdaptArgs),

    /// Print the resolved _routes.json without writing anything
    Routes(RoutesArgs),
}

/// Options shared by every command that reads a build.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Build directory containing edgepack.build.json
    #[arg(default_value = "build", value_name = "BUILD_DIR")]
    pub build: PathBuf,

    /// Project root, where edgepack.toml is looked up
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Explicit config file (edgepack.toml or package.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Route patterns that invoke the worker (replaces routes.include)
    #[arg(long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Route patterns served statically (replaces routes.exclude)
    ///
    /// Accepts the tokens <build>, <files>, <prerendered> and <all>.
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AdaptArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Deployment output directory (overrides output.dir)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Scratch directory for generated sources (overrides output.scratch)
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}
