//! Symbolic exclude tokens.

/// A single exclude rule as written in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleToken<'a> {
    /// `<all>`: shorthand for `<build>`, `<files>` and `<prerendered>`.
    All,
    /// `<build>`: the framework's internal asset directory.
    Build,
    /// `<files>`: every routable static file from the client build.
    Files,
    /// `<prerendered>`: every prerendered page that is not a redirect.
    Prerendered,
    /// Any other string, used as a path pattern as-is.
    Literal(&'a str),
}

impl<'a> RuleToken<'a> {
    pub fn parse(rule: &'a str) -> Self {
        match rule {
            "<all>" => Self::All,
            "<build>" => Self::Build,
            "<files>" => Self::Files,
            "<prerendered>" => Self::Prerendered,
            other => Self::Literal(other),
        }
    }

    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}
