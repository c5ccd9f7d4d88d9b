//! Node configuration text: a fenced `key: value` header plus a free-form body.
//!
//! ```text
//! ---
//! type: agent
//! status: active
//! ---
//!
//! # Instructions for this node
//! ```
//!
//! Any string is a valid configuration. Text without a well-formed header is
//! all body.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::NodeKind;

const FENCE: &str = "---\n";
const CLOSING_FENCE: &str = "\n---\n";

/// Parsed node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Header properties in the order they appear
    pub frontmatter: IndexMap<String, String>,
    /// Everything after the header
    pub body: String,
}

impl NodeConfig {
    /// Create a configuration from parts.
    pub fn new(frontmatter: IndexMap<String, String>, body: impl Into<String>) -> Self {
        Self {
            frontmatter,
            body: body.into(),
        }
    }

    /// Parse raw configuration text. Never fails.
    pub fn parse(raw: &str) -> Self {
        let Some((header, rest)) = split_header(raw) else {
            return Self {
                frontmatter: IndexMap::new(),
                body: raw.to_string(),
            };
        };

        let mut frontmatter = IndexMap::new();
        for line in header.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            frontmatter.insert(key.to_string(), value.trim().to_string());
        }

        // `stringify` separates header and body with one blank line.
        let body = rest.strip_prefix('\n').unwrap_or(rest);

        Self {
            frontmatter,
            body: body.to_string(),
        }
    }

    /// Value of a header property.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.frontmatter.get(key).map(String::as_str)
    }

    /// Set a header property, keeping its position if it already exists.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.frontmatter.insert(key.into(), value.into());
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Configuration given to a node created from the add menu.
    pub fn new_node_template(kind: NodeKind) -> String {
        format!("---\ntype: {kind}\nstatus: active\n---\n# Configure your {kind} node here.")
    }

    /// Configuration shown for a node that has never been edited.
    pub fn idle_template(kind: NodeKind) -> String {
        format!("---\ntype: {kind}\nstatus: idle\n---\n# Write logic here...")
    }
}

impl fmt::Display for NodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FENCE)?;
        for (key, value) in &self.frontmatter {
            writeln!(f, "{key}: {value}")?;
        }
        f.write_str(FENCE)?;
        f.write_str("\n")?;
        f.write_str(&self.body)
    }
}

/// Serialize a header and body into configuration text.
pub fn stringify(frontmatter: &IndexMap<String, String>, body: &str) -> String {
    let mut out = String::from(FENCE);
    for (key, value) in frontmatter {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(body);
    out
}

/// Split `---\n<header>\n---\n<rest>` at the first closing fence.
fn split_header(raw: &str) -> Option<(&str, &str)> {
    let after_open = raw.strip_prefix(FENCE)?;
    if let Some(rest) = after_open.strip_prefix(FENCE) {
        return Some(("", rest));
    }
    let end = after_open.find(CLOSING_FENCE)?;
    Some((&after_open[..end], &after_open[end + CLOSING_FENCE.len()..]))
}
