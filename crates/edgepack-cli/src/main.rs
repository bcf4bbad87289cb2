//! edgepack CLI entry point.

use clap::Parser;
use edgepack_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Adapt(adapt_args) => commands::adapt_execute(adapt_args).await,
        cli::Command::Routes(routes_args) => commands::routes_execute(routes_args),
    };

    result.map_err(error::cli_error_to_miette)
}
