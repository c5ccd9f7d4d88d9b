//! Everything a renderer needs to draw one frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use swarmgraph_geometry::{edge_path, CubicBezier};
use swarmgraph_graph::{Color, Connections, EdgeId, GraphStore, Node, NodeId};
use swarmgraph_viewport::Viewport;

use crate::engine::{SimulationEngine, SimulationStats};
use crate::random::RandomSource;
use crate::signal::{Payload, SignalId};

/// An edge with its resolved curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub label: Option<String>,
    pub path: CubicBezier,
}

/// A live signal placed on its edge's curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalView {
    pub id: SignalId,
    pub edge: EdgeId,
    pub progress: f64,
    /// Graph-space position
    pub position: DVec2,
    pub color: Color,
    pub payload: Payload,
}

/// Render boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub clock_ms: f64,
    pub running: bool,
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeView>,
    pub signals: Vec<SignalView>,
    /// Nodes pulsing at `clock_ms`
    pub processing: Vec<NodeId>,
    pub viewport: Viewport,
    pub selected: Option<NodeId>,
    /// Neighbours and incident edges of the selected node
    pub highlight: Option<Connections>,
    pub stats: SimulationStats,
}

impl FrameSnapshot {
    pub fn capture<R: RandomSource>(
        store: &GraphStore,
        engine: &SimulationEngine<R>,
        viewport: Viewport,
    ) -> Self {
        let edges = store
            .edges()
            .filter_map(|edge| {
                let (_, source, target) = store.resolve_edge(&edge.id)?;
                Some(EdgeView {
                    id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    label: edge.label.clone(),
                    path: edge_path(source.position(), target.position()),
                })
            })
            .collect();

        let signals = engine
            .signals()
            .iter()
            .filter_map(|signal| {
                let (_, source, target) = store.resolve_edge(&signal.edge)?;
                let path = edge_path(source.position(), target.position());
                Some(SignalView {
                    id: signal.id,
                    edge: signal.edge.clone(),
                    progress: signal.progress,
                    position: path.point_at(signal.progress),
                    color: signal.color,
                    payload: signal.payload.clone(),
                })
            })
            .collect();

        let selected = store.selected().cloned();
        let highlight = selected.as_ref().map(|id| store.connected(id));

        Self {
            clock_ms: engine.clock_ms(),
            running: engine.is_running(),
            nodes: store.nodes().cloned().collect(),
            edges,
            signals,
            processing: engine.processing(),
            viewport,
            selected,
            highlight,
            stats: engine.stats().clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
