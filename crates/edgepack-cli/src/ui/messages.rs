//! Status message functions for terminal output.

use edgepack::BuildLog;
use owo_colors::OwoColorize;

use super::colors_enabled;

/// Print a success message to stderr.
pub fn success(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {}", message);
    }
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {}", message);
    }
}

/// Print a warning message to stderr.
///
/// ```no_run
/// use edgepack_cli::ui::warning;
///
/// warning("Dropping 3 exclude rules");
/// ```
pub fn warning(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {}", message);
    }
}

/// [`BuildLog`] that prints status lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiLog;

impl BuildLog for UiLog {
    fn info(&self, message: &str) {
        info(message);
    }

    fn warn(&self, message: &str) {
        warning(message);
    }
}
