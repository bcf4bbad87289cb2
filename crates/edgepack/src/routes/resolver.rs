//! Validation of the configured rule lists and expansion of exclude tokens.

use crate::artifacts::Prerendered;
use crate::config::ConfigError;

use super::token::RuleToken;
use super::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE, MAX_ROUTE_RULES, RoutesConfig, RuleList};

/// Files the platform reserves for itself; they are never routable assets.
const RESERVED_FILES: [&str; 2] = ["_headers", "_redirects"];

/// Facts about the build that exclude tokens expand against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Base path + app directory, without a leading slash. Drives `<build>`.
    pub app_path: &'a str,
    /// Bare app directory. Assets below it are already covered by `<build>`.
    pub app_dir: &'a str,
    /// Client asset paths as written, relative to the base-path directory.
    pub assets: &'a [String],
    pub prerendered: &'a Prerendered,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        app_path: &'a str,
        app_dir: &'a str,
        assets: &'a [String],
        prerendered: &'a Prerendered,
    ) -> Self {
        Self {
            app_path,
            app_dir,
            assets,
            prerendered,
        }
    }

    /// Expand one token into concrete path patterns.
    pub fn expand(&self, token: RuleToken<'_>) -> Vec<String> {
        match token {
            RuleToken::All => [RuleToken::Build, RuleToken::Files, RuleToken::Prerendered]
                .into_iter()
                .flat_map(|token| self.expand(token))
                .collect(),
            RuleToken::Build => vec![format!("/{}/*", self.app_path)],
            RuleToken::Files => self
                .assets
                .iter()
                .filter(|file| self.is_routable_asset(file))
                .map(|file| format!("/{}", file))
                .collect(),
            RuleToken::Prerendered => self.prerendered.pages().map(str::to_string).collect(),
            RuleToken::Literal(rule) => vec![rule.to_string()],
        }
    }

    fn is_routable_asset(&self, file: &str) -> bool {
        let in_app_dir = file
            .strip_prefix(self.app_dir)
            .is_some_and(|rest| rest.starts_with('/'));
        !(in_app_dir || RESERVED_FILES.contains(&file))
    }
}

/// Include rules and fully expanded exclude rules, before the limit is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRules {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Check the configured lists and apply defaults.
///
/// The adapter calls this before touching the filesystem.
pub fn validate(config: &RoutesConfig) -> Result<(Vec<String>, Vec<String>), ConfigError> {
    let include = rules_or_default(config.include.as_ref(), "routes.include", DEFAULT_INCLUDE)?;
    let exclude = rules_or_default(config.exclude.as_ref(), "routes.exclude", DEFAULT_EXCLUDE)?;

    if include.is_empty() {
        return Err(ConfigError::EmptyIncludeList);
    }

    if include.len() > MAX_ROUTE_RULES {
        return Err(ConfigError::TooManyIncludeRules {
            count: include.len(),
            max: MAX_ROUTE_RULES,
        });
    }

    Ok((include, exclude))
}

fn rules_or_default(
    list: Option<&RuleList>,
    field: &'static str,
    default: &[&str],
) -> Result<Vec<String>, ConfigError> {
    match list {
        None => Ok(default.iter().map(|rule| rule.to_string()).collect()),
        Some(RuleList::Rules(rules)) => Ok(rules.clone()),
        Some(RuleList::Malformed(_)) => Err(ConfigError::InvalidConfigShape { field }),
    }
}

/// Expand exclude rules left to right, keeping order.
pub fn expand_exclude(rules: &[String], ctx: &RuleContext<'_>) -> Vec<String> {
    rules
        .iter()
        .flat_map(|rule| {
            let token = RuleToken::parse(rule);
            let expanded = ctx.expand(token);
            if token.is_symbolic() {
                tracing::debug!(token = %rule, rules = expanded.len(), "expanded exclude token");
            }
            expanded
        })
        .collect()
}

/// Validate the configuration and expand its exclude tokens.
///
/// Include rules come back exactly as configured.
pub fn resolve(config: &RoutesConfig, ctx: &RuleContext<'_>) -> Result<ResolvedRules, ConfigError> {
    let (include, exclude) = validate(config)?;
    let exclude = expand_exclude(&exclude, ctx);

    tracing::debug!(
        include = include.len(),
        exclude = exclude.len(),
        "resolved route rules"
    );

    Ok(ResolvedRules { include, exclude })
}
