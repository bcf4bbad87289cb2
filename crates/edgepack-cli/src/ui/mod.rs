//! Terminal status output.
//!
//! Status lines go to stderr so that stdout stays clean for machine-readable
//! output such as `edgepack routes`.

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{UiLog, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Check whether stderr should get colors.
///
/// `NO_COLOR` disables and `FORCE_COLOR` enables; otherwise colors follow
/// whether stderr is attended.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Decide color support once, honoring `--no-color`.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_flag_disables_colors() {
        init_colors(true);
        assert!(!colors_enabled());
    }
}
