//! Rule-count ceiling.
//!
//! Cloudflare Pages rejects a `_routes.json` with more than
//! [`MAX_ROUTE_RULES`] rules in total. Include rules are never dropped: the
//! exclude list absorbs all of the overflow, losing entries from the end.

use crate::artifacts::BuildLog;

use super::MAX_ROUTE_RULES;

/// Where the platform documents the routing limits.
pub const ROUTING_LIMITS_URL: &str =
    "https://developers.cloudflare.com/pages/platform/functions/routing/#limits";

/// Exclude rules that survived the limit, and how many were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enforced {
    pub exclude: Vec<String>,
    pub dropped: usize,
}

/// Number of rules over the ceiling, or zero.
pub fn excess(include: usize, exclude: usize) -> usize {
    (include + exclude).saturating_sub(MAX_ROUTE_RULES)
}

pub fn overflow_message(dropped: usize) -> String {
    format!(
        "Function includes/excludes exceeds _routes.json limits (see {}). \
         Dropping {} exclude rules, this will cause unnecessary function invocations.",
        ROUTING_LIMITS_URL, dropped
    )
}

/// Trim `exclude` so that `include + exclude` fits the ceiling.
///
/// Warns through `log` when anything is dropped. Never fails.
pub fn enforce(include: &[String], mut exclude: Vec<String>, log: &dyn BuildLog) -> Enforced {
    let excess = excess(include.len(), exclude.len());
    if excess == 0 {
        return Enforced {
            exclude,
            dropped: 0,
        };
    }

    let keep = exclude.len().saturating_sub(excess);
    let dropped = exclude.len() - keep;
    log.warn(&overflow_message(dropped));
    exclude.truncate(keep);

    Enforced { exclude, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        warnings: Mutex<Vec<String>>,
    }

    impl BuildLog for RecordingLog {
        fn info(&self, _message: &str) {}

        fn warn(&self, message: &str) {
            self.warnings.lock().push(message.to_string());
        }
    }

    fn rules(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("/{}{}", prefix, i)).collect()
    }

    #[test]
    fn under_the_limit_is_untouched() {
        let log = RecordingLog::default();
        let exclude = rules("x", 99);

        let enforced = enforce(&rules("i", 1), exclude.clone(), &log);

        assert_eq!(enforced.exclude, exclude);
        assert_eq!(enforced.dropped, 0);
        assert!(log.warnings.lock().is_empty());
    }

    #[test]
    fn drops_from_the_end() {
        let log = RecordingLog::default();
        let exclude = rules("x", 50);

        let enforced = enforce(&rules("i", 60), exclude.clone(), &log);

        assert_eq!(enforced.exclude, exclude[..40].to_vec());
        assert_eq!(enforced.dropped, 10);

        let warnings = log.warnings.lock();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Dropping 10 exclude rules"));
        assert!(warnings[0].contains(ROUTING_LIMITS_URL));
    }

    #[test]
    fn full_include_list_leaves_no_excludes() {
        let log = RecordingLog::default();

        let enforced = enforce(&rules("i", 100), rules("x", 3), &log);

        assert!(enforced.exclude.is_empty());
        assert_eq!(enforced.dropped, 3);
    }

    #[test]
    fn excess_saturates() {
        assert_eq!(excess(1, 1), 0);
        assert_eq!(excess(100, 0), 0);
        assert_eq!(excess(100, 1), 1);
    }
}
