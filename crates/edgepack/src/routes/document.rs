//! The `_routes.json` document.

use serde::{Deserialize, Serialize};

/// Self-identifying description written into every document.
pub const ROUTES_DESCRIPTION: &str = "Generated by edgepack";

/// Cloudflare Pages routing rules, version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesDocument {
    pub version: u32,
    pub description: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl RoutesDocument {
    /// Assemble the document. Size and shape were checked upstream.
    pub fn build(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            version: 1,
            description: ROUTES_DESCRIPTION.to_string(),
            include,
            exclude,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.include.len() + self.exclude.len()
    }

    /// Pretty JSON indented with tabs, no trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = Vec::with_capacity(256);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
