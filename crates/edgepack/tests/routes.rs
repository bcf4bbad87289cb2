//! End-to-end tests for `_routes.json` generation.

use edgepack::routes::{RoutesConfig, RuleContext, generate_routes, routes_document};
use edgepack::{BuildLog, ConfigError, MAX_ROUTE_RULES, Prerendered, RuleList, TracingLog};
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

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("/{prefix}/{i}")).collect()
}

#[test]
fn scenario_build_token() {
    let prerendered = Prerendered::default();
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);
    let config = RoutesConfig::new(["/*"], ["<build>"]);

    let doc = routes_document(&config, &ctx, &TracingLog).unwrap();

    assert_eq!(doc.include, vec!["/*"]);
    assert_eq!(doc.exclude, vec!["/_app/*"]);
}

#[test]
fn scenario_files_token() {
    let prerendered = Prerendered::default();
    let assets = strings(&["_app/start.js", "robots.txt", "_headers"]);
    let ctx = RuleContext::new("_app", "_app", &assets, &prerendered);
    let config = RoutesConfig::new(["/*"], ["<files>"]);

    let doc = routes_document(&config, &ctx, &TracingLog).unwrap();

    assert_eq!(doc.exclude, vec!["/robots.txt"]);
}

#[test]
fn scenario_prerendered_token() {
    let prerendered = Prerendered::new(["/a", "/b"], ["/b"]);
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);
    let config = RoutesConfig::new(["/*"], ["<prerendered>"]);

    let doc = routes_document(&config, &ctx, &TracingLog).unwrap();

    assert_eq!(doc.exclude, vec!["/a"]);
}

#[test]
fn scenario_overflow_drops_trailing_excludes() {
    let prerendered = Prerendered::default();
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);
    let include = numbered("in", 60);
    let exclude = numbered("ex", 50);
    let config = RoutesConfig::new(include.clone(), exclude.clone());
    let log = RecordingLog::default();

    let outcome = generate_routes(&config, &ctx, &log).unwrap();

    assert_eq!(outcome.document.include, include);
    assert_eq!(outcome.document.exclude, exclude[..40].to_vec());
    assert_eq!(outcome.dropped, 10);
    assert_eq!(outcome.document.rule_count(), MAX_ROUTE_RULES);

    let warnings = log.warnings.lock();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("10"));
}

#[test]
fn include_is_returned_unchanged_for_every_valid_length() {
    let prerendered = Prerendered::default();
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);

    for len in [1, 2, 50, 99, 100] {
        let include = numbered("in", len);
        let config = RoutesConfig::new(include.clone(), ["<build>"]);
        let doc = routes_document(&config, &ctx, &RecordingLog::default()).unwrap();
        assert_eq!(doc.include, include);
        assert!(doc.rule_count() <= MAX_ROUTE_RULES);
    }
}

#[test]
fn all_token_orders_build_files_prerendered() {
    let prerendered = Prerendered::new(["/", "/blog", "/moved"], ["/moved"]);
    let assets = strings(&[
        "_app/immutable/entry/start.js",
        "_app/version.json",
        "favicon.png",
        "_redirects",
        "robots.txt",
    ]);
    let ctx = RuleContext::new("_app", "_app", &assets, &prerendered);

    let doc = routes_document(&RoutesConfig::default(), &ctx, &TracingLog).unwrap();

    assert_eq!(doc.include, vec!["/*"]);
    assert_eq!(
        doc.exclude,
        vec!["/_app/*", "/favicon.png", "/robots.txt", "/", "/blog"]
    );
}

#[test]
fn base_path_prefixes_only_the_build_rule() {
    let prerendered = Prerendered::default();
    let assets = strings(&["_app/start.js", "logo.svg"]);
    let ctx = RuleContext::new("docs/_app", "_app", &assets, &prerendered);

    let doc = routes_document(&RoutesConfig::default(), &ctx, &TracingLog).unwrap();

    assert_eq!(doc.exclude, vec!["/docs/_app/*", "/logo.svg"]);
}

#[test]
fn within_budget_emits_no_warning() {
    let prerendered = Prerendered::default();
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);
    let config = RoutesConfig::new(numbered("in", 50), numbered("ex", 50));
    let log = RecordingLog::default();

    let outcome = generate_routes(&config, &ctx, &log).unwrap();

    assert_eq!(outcome.document.exclude.len(), 50);
    assert_eq!(outcome.dropped, 0);
    assert!(log.warnings.lock().is_empty());
}

#[test]
fn invalid_configurations_are_rejected() {
    let prerendered = Prerendered::default();
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);
    let log = RecordingLog::default();

    let empty = RoutesConfig::new(Vec::<String>::new(), ["<all>"]);
    assert!(matches!(
        generate_routes(&empty, &ctx, &log),
        Err(ConfigError::EmptyIncludeList)
    ));

    let too_many = RoutesConfig::new(numbered("in", 101), ["<all>"]);
    assert!(matches!(
        generate_routes(&too_many, &ctx, &log),
        Err(ConfigError::TooManyIncludeRules { count: 101, max: 100 })
    ));

    let scalar = RoutesConfig {
        include: None,
        exclude: Some(RuleList::Malformed(serde_json::json!("<all>"))),
    };
    let err = generate_routes(&scalar, &ctx, &log).unwrap_err();
    assert!(err.to_string().contains("routes.exclude"));
}

#[test]
fn document_serializes_with_tabs() {
    let prerendered = Prerendered::default();
    let ctx = RuleContext::new("_app", "_app", &[], &prerendered);

    let doc = routes_document(&RoutesConfig::default(), &ctx, &TracingLog).unwrap();
    let json = doc.to_json().unwrap();

    assert_eq!(
        json,
        "{\n\t\"version\": 1,\n\t\"description\": \"Generated by edgepack\",\n\t\"include\": [\n\t\t\"/*\"\n\t],\n\t\"exclude\": [\n\t\t\"/_app/*\"\n\t]\n}"
    );
}
