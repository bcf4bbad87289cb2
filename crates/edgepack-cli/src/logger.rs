//! Logging setup for the edgepack CLI.
//!
//! Library stages log through `tracing`; this installs the subscriber that
//! prints them.
//!
//! ```rust,no_run
//! use edgepack_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Adapting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "edgepack=debug,edgepack_cli=debug";
const QUIET_FILTER: &str = "edgepack=error,edgepack_cli=error";
const DEFAULT_FILTER: &str = "edgepack=info,edgepack_cli=info";

/// Install the global tracing subscriber.
///
/// Level selection, first match wins:
/// 1. `--verbose`: debug
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = select_filter(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
