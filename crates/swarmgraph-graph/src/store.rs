//! Graph store: nodes, edges and per-node runtime state.

use std::collections::HashMap;

use glam::DVec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::context::{ContextEntry, ContextLog, EntryDraft, EntryId, EntryKind};
use crate::document::GraphDocument;
use crate::error::{Error, Result};
use crate::types::{Edge, EdgeId, Node, NodeId, NodeKind};

/// Mutable state attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRuntime {
    /// Raw configuration text (frontmatter + body)
    pub config: String,
    /// Received packets and injected notes, newest first
    pub context: ContextLog,
}

/// Nodes and edges touching a node, for selection highlighting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connections {
    /// The node itself plus every direct neighbour
    pub nodes: Vec<NodeId>,
    /// Every incident edge, either direction
    pub edges: Vec<EdgeId>,
}

/// Owns the graph and its per-node runtime state.
///
/// Nodes and edges iterate in insertion order.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    runtime: HashMap<NodeId, NodeRuntime>,
    selected: Option<NodeId>,
    next_node: u64,
    next_edge: u64,
    next_entry: u64,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a document, validating every edge.
    pub fn from_document(doc: GraphDocument) -> Result<Self> {
        let mut store = Self::new();
        for node in doc.nodes {
            store.insert_node(node)?;
        }
        for edge in doc.edges {
            store.insert_edge(edge)?;
        }
        Ok(store)
    }

    /// Export nodes and edges (runtime state is not included).
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a node of `kind` at `position` with a fresh id and default config.
    pub fn add_node(&mut self, kind: NodeKind, position: DVec2) -> NodeId {
        let id = loop {
            let candidate = NodeId(format!("n{}", self.next_node));
            self.next_node += 1;
            if !self.nodes.contains_key(&candidate) {
                break candidate;
            }
        };

        let node = Node {
            id: id.clone(),
            kind,
            label: format!("New {}", kind.label()),
            x: position.x,
            y: position.y,
        };
        self.nodes.insert(id.clone(), node);
        self.runtime.insert(
            id.clone(),
            NodeRuntime {
                config: NodeConfig::new_node_template(kind),
                context: ContextLog::new(),
            },
        );

        tracing::debug!(node = %id, %kind, "node added");
        id
    }

    /// Insert a fully specified node.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Connect two existing nodes with a fresh edge id.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId, label: Option<String>) -> Result<EdgeId> {
        let id = loop {
            let candidate = EdgeId(format!("e{}", self.next_edge));
            self.next_edge += 1;
            if !self.edges.contains_key(&candidate) {
                break candidate;
            }
        };

        self.insert_edge(Edge {
            id: id.clone(),
            source: source.clone(),
            target: target.clone(),
            label,
        })?;
        Ok(id)
    }

    /// Insert a fully specified edge.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(Error::DuplicateEdge(edge.id));
        }
        if edge.source == edge.target {
            return Err(Error::SelfLoop(edge.source));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(Error::UnknownNode(endpoint.clone()));
            }
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Delete a node together with its edges and runtime state.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        self.edges.retain(|_, e| e.source != *id && e.target != *id);
        self.runtime.remove(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        tracing::debug!(node = %id, "node removed");
        Some(node)
    }

    /// Delete an edge.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        self.edges.shift_remove(id)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Resolve an edge to itself and both endpoint nodes.
    ///
    /// `None` if the edge or either endpoint no longer exists.
    pub fn resolve_edge(&self, id: &EdgeId) -> Option<(&Edge, &Node, &Node)> {
        let edge = self.edges.get(id)?;
        let source = self.nodes.get(&edge.source)?;
        let target = self.nodes.get(&edge.target)?;
        Some((edge, source, target))
    }

    /// Edges leaving `id`, in insertion order.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| e.source == *id)
    }

    /// All trigger nodes, in insertion order.
    pub fn triggers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.kind.is_trigger())
    }

    /// Neighbours and incident edges of a node.
    pub fn connected(&self, id: &NodeId) -> Connections {
        let mut connections = Connections {
            nodes: vec![id.clone()],
            edges: Vec::new(),
        };
        for edge in self.edges.values() {
            let other = if edge.source == *id {
                &edge.target
            } else if edge.target == *id {
                &edge.source
            } else {
                continue;
            };
            connections.edges.push(edge.id.clone());
            if !connections.nodes.contains(other) {
                connections.nodes.push(other.clone());
            }
        }
        connections
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a node, or clear the selection with `None`.
    pub fn select_node(&mut self, id: Option<NodeId>) {
        match id {
            Some(id) if !self.nodes.contains_key(&id) => {
                tracing::debug!(node = %id, "select ignored: unknown node");
            }
            id => self.selected = id,
        }
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    // ------------------------------------------------------------------
    // Runtime state
    // ------------------------------------------------------------------

    pub fn runtime(&self, id: &NodeId) -> Option<&NodeRuntime> {
        self.runtime.get(id)
    }

    /// Overwrite a node's configuration text.
    pub fn update_config(&mut self, id: &NodeId, raw: impl Into<String>) {
        match self.runtime_mut(id) {
            Some(rt) => rt.config = raw.into(),
            None => tracing::debug!(node = %id, "config update ignored: unknown node"),
        }
    }

    /// Configuration text as shown to the user: stored text, or the idle
    /// template when the node has none.
    pub fn config_text(&self, id: &NodeId) -> Option<String> {
        let node = self.nodes.get(id)?;
        match self.runtime.get(id) {
            Some(rt) if !rt.config.is_empty() => Some(rt.config.clone()),
            _ => Some(NodeConfig::idle_template(node.kind)),
        }
    }

    /// Parsed configuration of a node.
    pub fn config(&self, id: &NodeId) -> Option<NodeConfig> {
        self.config_text(id).map(|raw| NodeConfig::parse(&raw))
    }

    /// Set one frontmatter property, keeping the rest of the config.
    pub fn set_config_field(&mut self, id: &NodeId, key: &str, value: &str) {
        let Some(mut config) = self.config(id) else {
            tracing::debug!(node = %id, "config edit ignored: unknown node");
            return;
        };
        config.set_field(key, value);
        self.update_config(id, config.to_string());
    }

    /// Prepend a batch of entries to a node's context, capped to capacity.
    pub fn append_context(&mut self, id: &NodeId, batch: Vec<EntryDraft>) {
        if !self.nodes.contains_key(id) {
            tracing::debug!(node = %id, "context append ignored: unknown node");
            return;
        }
        let entries: Vec<ContextEntry> = batch
            .into_iter()
            .map(|draft| ContextEntry {
                id: self.fresh_entry_id(),
                kind: draft.kind,
                content: draft.content,
            })
            .collect();
        if let Some(rt) = self.runtime_mut(id) {
            rt.context.prepend(entries);
        }
    }

    /// Add a hand-written note to a node's context. Blank text is ignored.
    pub fn inject_user_context(&mut self, id: &NodeId, text: &str) -> Option<EntryId> {
        let text = text.trim();
        if text.is_empty() || !self.nodes.contains_key(id) {
            return None;
        }
        let entry = ContextEntry {
            id: self.fresh_entry_id(),
            kind: EntryKind::User,
            content: text.to_string(),
        };
        let entry_id = entry.id;
        self.runtime_mut(id)?.context.prepend(vec![entry]);
        Some(entry_id)
    }

    /// Delete one context entry.
    pub fn remove_context(&mut self, id: &NodeId, entry: EntryId) -> bool {
        self.runtime
            .get_mut(id)
            .is_some_and(|rt| rt.context.remove(entry))
    }

    fn runtime_mut(&mut self, id: &NodeId) -> Option<&mut NodeRuntime> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        Some(self.runtime.entry(id.clone()).or_default())
    }

    fn fresh_entry_id(&mut self) -> EntryId {
        let id = EntryId(self.next_entry);
        self.next_entry += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CONTEXT_CAPACITY;

    fn chain() -> (GraphStore, NodeId, NodeId, NodeId) {
        let mut store = GraphStore::new();
        let a = store.add_node(NodeKind::Trigger, DVec2::new(0.0, 0.0));
        let b = store.add_node(NodeKind::Agent, DVec2::new(0.0, 150.0));
        let c = store.add_node(NodeKind::Output, DVec2::new(0.0, 300.0));
        store.add_edge(&a, &b, None).unwrap();
        store.add_edge(&b, &c, None).unwrap();
        (store, a, b, c)
    }

    #[test]
    fn added_node_gets_default_config() {
        let mut store = GraphStore::new();
        let id = store.add_node(NodeKind::Tool, DVec2::new(10.0, 20.0));

        let node = store.node(&id).unwrap();
        assert_eq!(node.label, "New Tool");
        assert_eq!(node.position(), DVec2::new(10.0, 20.0));

        let config = store.config(&id).unwrap();
        assert_eq!(config.field("type"), Some("tool"));
        assert_eq!(config.field("status"), Some("active"));
        assert!(store.runtime(&id).unwrap().context.is_empty());
    }

    #[test]
    fn fresh_ids_skip_existing() {
        let mut store = GraphStore::new();
        store.insert_node(Node::new("n0", NodeKind::Agent, "taken", 0.0, 0.0)).unwrap();
        let id = store.add_node(NodeKind::Agent, DVec2::ZERO);
        assert_eq!(id, NodeId::new("n1"));
    }

    #[test]
    fn edge_validation() {
        let (mut store, a, _, _) = chain();
        let ghost = NodeId::new("ghost");

        assert!(matches!(store.add_edge(&a, &ghost, None), Err(Error::UnknownNode(_))));
        assert!(matches!(store.add_edge(&a, &a, None), Err(Error::SelfLoop(_))));
        assert!(matches!(
            store.insert_edge(Edge::new("e0", "n0", "n1")),
            Err(Error::DuplicateEdge(_))
        ));
    }

    #[test]
    fn parallel_edges_are_distinct() {
        let (mut store, a, b, _) = chain();
        store.add_edge(&a, &b, Some("retry".into())).unwrap();
        assert_eq!(store.outgoing(&a).count(), 2);
    }

    #[test]
    fn removing_node_drops_incident_edges() {
        let (mut store, a, b, c) = chain();
        store.select_node(Some(b.clone()));
        store.remove_node(&b);

        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.selected(), None);
        assert!(store.node(&a).is_some());
        assert!(store.node(&c).is_some());
    }

    #[test]
    fn resolve_edge_requires_both_endpoints() {
        let (mut store, _, _, _) = chain();
        let edge = EdgeId::new("e0");
        assert!(store.resolve_edge(&edge).is_some());

        store.remove_edge(&edge);
        assert!(store.resolve_edge(&edge).is_none());
    }

    #[test]
    fn select_unknown_is_ignored() {
        let (mut store, a, _, _) = chain();
        store.select_node(Some(a.clone()));
        store.select_node(Some(NodeId::new("ghost")));
        assert_eq!(store.selected(), Some(&a));

        store.select_node(None);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn connected_lists_neighbours_and_edges() {
        let (store, a, b, c) = chain();
        let conn = store.connected(&b);
        assert_eq!(conn.nodes, vec![b.clone(), a, c]);
        assert_eq!(conn.edges, vec![EdgeId::new("e0"), EdgeId::new("e1")]);
    }

    #[test]
    fn config_is_overwritten() {
        let (mut store, a, _, _) = chain();
        store.update_config(&a, "free text");
        assert_eq!(store.config_text(&a).as_deref(), Some("free text"));
        assert_eq!(store.config(&a).unwrap().body, "free text");
    }

    #[test]
    fn unedited_imported_node_reads_idle_template() {
        let mut store = GraphStore::new();
        store.insert_node(Node::new("d1", NodeKind::Router, "Triage", 0.0, 0.0)).unwrap();

        let config = store.config(&NodeId::new("d1")).unwrap();
        assert_eq!(config.field("status"), Some("idle"));
    }

    #[test]
    fn set_config_field_rewrites_text() {
        let (mut store, a, _, _) = chain();
        store.set_config_field(&a, "status", "paused");

        let config = store.config(&a).unwrap();
        assert_eq!(config.field("status"), Some("paused"));
        assert_eq!(config.body, "# Configure your trigger node here.");
    }

    #[test]
    fn append_context_caps_at_capacity() {
        let (mut store, _, b, _) = chain();
        for i in 0..(CONTEXT_CAPACITY + 10) {
            store.append_context(&b, vec![EntryDraft::system(format!("packet {i}"))]);
        }

        let log = &store.runtime(&b).unwrap().context;
        assert_eq!(log.len(), CONTEXT_CAPACITY);
        assert_eq!(log.latest().unwrap().content, format!("packet {}", CONTEXT_CAPACITY + 9));
        assert_eq!(log.iter().last().unwrap().content, "packet 10");
    }

    #[test]
    fn append_context_creates_runtime_for_imported_nodes() {
        let mut store = GraphStore::new();
        store.insert_node(Node::new("d3", NodeKind::Aggregator, "Ingest", 0.0, 0.0)).unwrap();
        let id = NodeId::new("d3");

        store.append_context(&id, vec![EntryDraft::system("hello")]);
        assert_eq!(store.runtime(&id).unwrap().context.len(), 1);
        assert_eq!(store.runtime(&id).unwrap().config, "");
    }

    #[test]
    fn unknown_node_mutations_are_noops() {
        let mut store = GraphStore::new();
        let ghost = NodeId::new("ghost");
        store.update_config(&ghost, "x");
        store.append_context(&ghost, vec![EntryDraft::system("x")]);
        assert!(store.runtime(&ghost).is_none());
        assert!(store.config_text(&ghost).is_none());
    }

    #[test]
    fn user_context_injection() {
        let (mut store, a, _, _) = chain();
        assert_eq!(store.inject_user_context(&a, "   "), None);

        let entry = store.inject_user_context(&a, "  check the refund policy ").unwrap();
        let latest = store.runtime(&a).unwrap().context.latest().unwrap().clone();
        assert_eq!(latest.kind, EntryKind::User);
        assert_eq!(latest.content, "check the refund policy");

        assert!(store.remove_context(&a, entry));
        assert!(store.runtime(&a).unwrap().context.is_empty());
    }

    #[test]
    fn document_round_trip() {
        let (store, _, _, _) = chain();
        let doc = store.to_document();
        let rebuilt = GraphStore::from_document(doc).unwrap();
        assert_eq!(rebuilt.node_count(), 3);
        assert_eq!(rebuilt.edge_count(), 2);
    }
}
