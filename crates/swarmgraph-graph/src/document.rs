//! JSON graph documents and the built-in demo graph.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Edge, Node, NodeKind};

/// Nodes and edges as exchanged with the outside world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Support-desk workflow: two triggers feeding a triage router that
    /// branches into technical and billing lanes before merging, passing a
    /// QA checkpoint and replying.
    pub fn demo() -> Self {
        use NodeKind::*;

        let nodes = vec![
            Node::new("d1", Trigger, "Email Webhook", 200.0, 0.0),
            Node::new("d2", Trigger, "Slack Mention", -100.0, 0.0),
            Node::new("d3", Aggregator, "Ingest Queue", 50.0, 150.0),
            Node::new("d4", Router, "Triage Brain", 50.0, 300.0),
            Node::new("d5", Memory, "Fogsift Context", -200.0, 450.0),
            Node::new("d6", Tool, "Stripe API", 300.0, 450.0),
            Node::new("d7", Agent, "Tech Agent", -100.0, 600.0),
            Node::new("d8", Agent, "Billing Agent", 200.0, 600.0),
            Node::new("d9", Aggregator, "Response Merge", 50.0, 800.0),
            Node::new("d10", Checkpoint, "QA Check", 50.0, 950.0),
            Node::new("d11", Output, "Send Reply", 50.0, 1100.0),
        ];

        let edges = vec![
            Edge::new("de1", "d1", "d3"),
            Edge::new("de2", "d2", "d3"),
            Edge::new("de3", "d3", "d4"),
            Edge::new("de4", "d4", "d5").with_label("is_technical"),
            Edge::new("de5", "d4", "d6").with_label("is_billing"),
            Edge::new("de6", "d5", "d7"),
            Edge::new("de7", "d6", "d8"),
            Edge::new("de8", "d7", "d9"),
            Edge::new("de9", "d8", "d9"),
            Edge::new("de10", "d9", "d10"),
            Edge::new("de11", "d10", "d11"),
        ];

        Self { nodes, edges }
    }
}
