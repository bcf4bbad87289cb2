//! `_routes.json` synthesis.
//!
//! The document tells Cloudflare Pages which request paths invoke the worker
//! (`include`) and which are served straight from static assets
//! (`exclude`). It is produced in three steps:
//!
//! 1. [`resolver`]: validate the configured lists and expand the symbolic
//!    exclude tokens (`<all>`, `<build>`, `<files>`, `<prerendered>`).
//! 2. [`limits`]: trim excludes so the total fits [`MAX_ROUTE_RULES`].
//! 3. [`document`]: assemble the versioned document.

pub mod document;
pub mod limits;
pub mod resolver;
pub mod token;

use serde::{Deserialize, Deserializer, Serialize};

use crate::artifacts::BuildLog;
use crate::config::ConfigError;

pub use document::{ROUTES_DESCRIPTION, RoutesDocument};
pub use limits::{Enforced, enforce};
pub use resolver::{ResolvedRules, RuleContext, resolve};
pub use token::RuleToken;

/// Combined include + exclude ceiling enforced by the platform.
pub const MAX_ROUTE_RULES: usize = 100;

pub const DEFAULT_INCLUDE: &[&str] = &["/*"];
pub const DEFAULT_EXCLUDE: &[&str] = &["<all>"];

/// A rule list as it appears in the configuration.
///
/// Anything that is not a list of strings is kept as `Malformed` so that
/// validation can name the offending field instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleList {
    Rules(Vec<String>),
    Malformed(serde_json::Value),
}

impl<S: Into<String>> FromIterator<S> for RuleList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RuleList::Rules(iter.into_iter().map(Into::into).collect())
    }
}

/// The `routes` section of the adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Paths that invoke the worker. Defaults to `["/*"]` when absent.
    #[serde(
        default,
        deserialize_with = "present_rules",
        skip_serializing_if = "Option::is_none"
    )]
    pub include: Option<RuleList>,

    /// Paths served as static assets. Defaults to `["<all>"]` when absent.
    #[serde(
        default,
        deserialize_with = "present_rules",
        skip_serializing_if = "Option::is_none"
    )]
    pub exclude: Option<RuleList>,
}

/// Only a missing key falls back to the default; an explicit `null` is a
/// malformed list.
fn present_rules<'de, D>(deserializer: D) -> Result<Option<RuleList>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<RuleList>::deserialize(deserializer)?;
    Ok(Some(list.unwrap_or(RuleList::Malformed(serde_json::Value::Null))))
}

impl RoutesConfig {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            include: Some(include.into_iter().collect()),
            exclude: Some(exclude.into_iter().collect()),
        }
    }

    /// Validate without expanding. See [`resolver::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        resolver::validate(self).map(|_| ())
    }
}

/// A finished document plus the number of exclude rules the limit dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutesOutcome {
    pub document: RoutesDocument,
    pub dropped: usize,
}

/// Resolve, enforce the ceiling, and build the document.
pub fn generate_routes(
    config: &RoutesConfig,
    ctx: &RuleContext<'_>,
    log: &dyn BuildLog,
) -> Result<RoutesOutcome, ConfigError> {
    let ResolvedRules { include, exclude } = resolve(config, ctx)?;
    let Enforced { exclude, dropped } = enforce(&include, exclude, log);

    Ok(RoutesOutcome {
        document: RoutesDocument::build(include, exclude),
        dropped,
    })
}

/// Like [`generate_routes`], returning only the document.
pub fn routes_document(
    config: &RoutesConfig,
    ctx: &RuleContext<'_>,
    log: &dyn BuildLog,
) -> Result<RoutesDocument, ConfigError> {
    generate_routes(config, ctx, log).map(|outcome| outcome.document)
}
