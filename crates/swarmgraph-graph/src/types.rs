//! Graph vocabulary: node kinds, nodes, edges and colors.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A node identifier, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An edge identifier, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Signals emitted by trigger nodes
    pub const BRIGHT: Self = Self::from_hex(0xf8fafc);
    pub const CYAN: Self = Self::from_hex(0x06b6d4);
    pub const PINK: Self = Self::from_hex(0xec4899);
    pub const AMBER: Self = Self::from_hex(0xf59e0b);
    pub const RED: Self = Self::from_hex(0xef4444);
    pub const PURPLE: Self = Self::from_hex(0x8b5cf6);
    pub const EMERALD: Self = Self::from_hex(0x10b981);

    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// Parse `#rrggbb`.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

/// What a node does in the workflow. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Spontaneously emits signals
    Trigger,
    /// Branches by topology
    Router,
    /// LLM agent
    Agent,
    /// External API call
    Tool,
    /// Context store
    Memory,
    /// Merges branches
    Aggregator,
    /// Review gate
    Checkpoint,
    /// End of a flow; never relays
    Output,
}

impl NodeKind {
    /// Every kind, in add-menu order.
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Trigger,
        NodeKind::Router,
        NodeKind::Agent,
        NodeKind::Tool,
        NodeKind::Memory,
        NodeKind::Aggregator,
        NodeKind::Checkpoint,
        NodeKind::Output,
    ];

    /// Wire name (`"trigger"`, `"router"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Router => "router",
            NodeKind::Agent => "agent",
            NodeKind::Tool => "tool",
            NodeKind::Memory => "memory",
            NodeKind::Aggregator => "aggregator",
            NodeKind::Checkpoint => "checkpoint",
            NodeKind::Output => "output",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "Trigger",
            NodeKind::Router => "Router",
            NodeKind::Agent => "Agent",
            NodeKind::Tool => "Tool",
            NodeKind::Memory => "Memory",
            NodeKind::Aggregator => "Merge",
            NodeKind::Checkpoint => "Checkpoint",
            NodeKind::Output => "Output",
        }
    }

    /// Color of signals relayed out of this kind of node.
    pub fn accent(&self) -> Color {
        match self {
            NodeKind::Trigger => Color::CYAN,
            NodeKind::Router | NodeKind::Aggregator => Color::PURPLE,
            NodeKind::Agent => Color::PINK,
            NodeKind::Tool | NodeKind::Memory => Color::AMBER,
            NodeKind::Checkpoint => Color::RED,
            NodeKind::Output => Color::EMERALD,
        }
    }

    /// Terminal nodes absorb signals instead of relaying them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::Output)
    }

    /// Trigger nodes originate signals on their own.
    pub fn is_trigger(&self) -> bool {
        matches!(self, NodeKind::Trigger)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            x,
            y,
        }
    }

    /// Graph-space position of the node center.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// A directed relay path between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
