//! One interactive graph instance.
//!
//! [`Sandbox`] ties a [`GraphStore`], a [`SimulationEngine`], a
//! [`ViewportController`] and a [`FrameLoop`] together and exposes the
//! actions a host UI performs. Several sandboxes can live side by side;
//! nothing is shared between them.

use glam::DVec2;
use swarmgraph_graph::{EdgeId, EntryId, GraphDocument, GraphStore, NodeId, NodeKind};
use swarmgraph_viewport::{PointerEvent, Viewport, ViewportController};
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::{SimulationEngine, TickReport};
use crate::error::Result;
use crate::random::{RandomSource, StdRng};
use crate::scheduler::{FrameLoop, FrameScheduler, ManualScheduler};
use crate::signal::SignalId;
use crate::snapshot::FrameSnapshot;

/// Vertical gap between successively added nodes.
const NODE_SPACING: f64 = 150.0;

pub struct Sandbox<S = ManualScheduler, R = StdRng> {
    store: GraphStore,
    engine: SimulationEngine<R>,
    view: ViewportController,
    frames: FrameLoop<S>,
    screen: DVec2,
}

impl Sandbox {
    /// Headless sandbox over `store`, viewed centered.
    pub fn new(store: GraphStore, config: EngineConfig, width: f64, height: f64) -> Self {
        Self::with_parts(
            store,
            SimulationEngine::new(config),
            ManualScheduler::new(),
            width,
            height,
        )
    }

    /// The support-desk demo graph with the demo framing.
    pub fn demo(config: EngineConfig, width: f64, height: f64) -> Result<Self> {
        let store = GraphStore::from_document(GraphDocument::demo())?;
        let mut sandbox = Self::new(store, config, width, height);
        sandbox.view.reset(Viewport::demo(width, height));
        Ok(sandbox)
    }
}

impl<S: FrameScheduler, R: RandomSource> Sandbox<S, R> {
    pub fn with_parts(
        store: GraphStore,
        engine: SimulationEngine<R>,
        scheduler: S,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            store,
            engine,
            view: ViewportController::new(Viewport::centered(width, height)),
            frames: FrameLoop::new(scheduler),
            screen: DVec2::new(width, height),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn engine(&self) -> &SimulationEngine<R> {
        &self.engine
    }

    pub fn frames(&self) -> &FrameLoop<S> {
        &self.frames
    }

    pub fn viewport(&self) -> Viewport {
        self.view.viewport()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Start the simulation. Already running sandboxes are left alone.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.engine.start();
        self.frames.start();
    }

    pub fn stop(&mut self) {
        self.frames.stop();
        self.engine.stop();
    }

    /// Frame callback from the host at `timestamp` (ms).
    pub fn on_frame(&mut self, timestamp: f64) -> Option<TickReport> {
        let delta = self.frames.on_frame(timestamp)?;
        Some(self.engine.tick(delta, &mut self.store))
    }

    /// Put a signal on an edge by hand.
    pub fn inject_signal(&mut self, edge: &EdgeId) -> Option<SignalId> {
        self.engine.inject(edge, &self.store)
    }

    /// Fire a trigger node by hand.
    pub fn fire_trigger(&mut self, id: &NodeId) -> usize {
        self.engine.fire_trigger(id, &self.store)
    }

    // ------------------------------------------------------------------
    // Graph editing
    // ------------------------------------------------------------------

    /// Add a node at the view's center, stacked below the existing ones.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let center = self.view.viewport().graph_center(self.screen.x, self.screen.y);
        let offset = DVec2::new(0.0, NODE_SPACING * self.store.node_count() as f64);
        self.store.add_node(kind, center + offset)
    }

    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        label: Option<String>,
    ) -> swarmgraph_graph::Result<EdgeId> {
        self.store.add_edge(source, target, label)
    }

    /// Delete a node and its edges; signals on them vanish.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        if self.store.remove_node(id).is_none() {
            return false;
        }
        self.engine.forget_node(id);
        let dropped = self.engine.prune_dangling(&self.store);
        debug!(node = %id, dropped, "node removed");
        true
    }

    /// Delete an edge; signals on it vanish.
    pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
        if self.store.remove_edge(id).is_none() {
            return false;
        }
        let dropped = self.engine.prune_dangling(&self.store);
        debug!(edge = %id, dropped, "edge removed");
        true
    }

    pub fn select_node(&mut self, id: Option<NodeId>) {
        self.store.select_node(id);
    }

    pub fn update_config(&mut self, id: &NodeId, raw: impl Into<String>) {
        self.store.update_config(id, raw);
    }

    pub fn set_config_field(&mut self, id: &NodeId, key: &str, value: &str) {
        self.store.set_config_field(id, key, value);
    }

    pub fn inject_context(&mut self, id: &NodeId, text: &str) -> Option<EntryId> {
        self.store.inject_user_context(id, text)
    }

    pub fn remove_context(&mut self, id: &NodeId, entry: EntryId) -> bool {
        self.store.remove_context(id, entry)
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Canvas pointer input. Pressing on the canvas clears the selection.
    pub fn pointer(&mut self, event: PointerEvent) {
        if matches!(event, PointerEvent::Down { .. }) {
            self.store.select_node(None);
        }
        self.view.handle(event);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.screen = DVec2::new(width, height);
    }

    /// Reset to the centered preset for the current screen size.
    pub fn center_view(&mut self) {
        self.view
            .reset(Viewport::centered(self.screen.x, self.screen.y));
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.store, &self.engine, self.view.viewport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use swarmgraph_graph::{EntryKind, Node};
    use swarmgraph_viewport::PointerId;

    fn quiet(store: GraphStore) -> Sandbox<ManualScheduler, ScriptedRandom> {
        let config = EngineConfig {
            progress_per_ms: 0.03125,
            spawn_rate: 0.0,
            ..Default::default()
        };
        Sandbox::with_parts(
            store,
            SimulationEngine::with_random(config, ScriptedRandom::silent()),
            ManualScheduler::new(),
            800.0,
            600.0,
        )
    }

    fn pair() -> GraphStore {
        let mut store = GraphStore::new();
        store.insert_node(Node::new("a", NodeKind::Trigger, "A", 0.0, 0.0)).unwrap();
        store.insert_node(Node::new("b", NodeKind::Output, "B", 0.0, 300.0)).unwrap();
        store.add_edge(&NodeId::new("a"), &NodeId::new("b"), None).unwrap();
        store
    }

    #[test]
    fn new_nodes_stack_below_center() {
        let mut sandbox = quiet(GraphStore::new());
        let center = sandbox.viewport().graph_center(800.0, 600.0);

        let first = sandbox.add_node(NodeKind::Agent);
        let second = sandbox.add_node(NodeKind::Tool);

        let first = sandbox.store().node(&first).unwrap().position();
        let second = sandbox.store().node(&second).unwrap().position();
        assert!((first - center).length() < 1e-9);
        assert!((second.y - first.y - 150.0).abs() < 1e-9);
        assert_eq!(second.x, first.x);
    }

    #[test]
    fn frames_drive_ticks() {
        let mut sandbox = quiet(pair());
        sandbox.start();
        sandbox.inject_signal(&EdgeId::new("e0")).unwrap();

        assert!(sandbox.on_frame(1000.0).is_none());
        let report = sandbox.on_frame(1016.0).unwrap();
        assert_eq!(report.progress_delta, 0.5);
        let report = sandbox.on_frame(1032.0).unwrap();
        assert_eq!(report.arrived, 1);
    }

    #[test]
    fn start_while_running_keeps_signals() {
        let mut sandbox = quiet(pair());
        sandbox.start();
        sandbox.inject_signal(&EdgeId::new("e0")).unwrap();
        sandbox.on_frame(0.0);

        sandbox.start();
        assert_eq!(sandbox.engine().signals().len(), 1);
        assert_eq!(sandbox.frames().scheduler().requested(), 2);
        assert_eq!(sandbox.on_frame(16.0).map(|r| r.progress_delta), Some(0.5));
    }

    #[test]
    fn stop_suppresses_late_frames() {
        let mut sandbox = quiet(pair());
        sandbox.start();
        sandbox.on_frame(0.0);
        sandbox.stop();

        assert!(sandbox.on_frame(16.0).is_none());
        assert_eq!(sandbox.frames().scheduler().pending(), None);
        assert!(!sandbox.is_running());
    }

    #[test]
    fn removing_target_prunes_signals() {
        let mut sandbox = quiet(pair());
        sandbox.start();
        sandbox.inject_signal(&EdgeId::new("e0")).unwrap();

        assert!(sandbox.remove_node(&NodeId::new("b")));
        assert!(sandbox.engine().signals().is_empty());
        assert!(!sandbox.remove_node(&NodeId::new("b")));
    }

    #[test]
    fn removing_edge_prunes_signals() {
        let mut sandbox = quiet(pair());
        sandbox.inject_signal(&EdgeId::new("e0")).unwrap();

        assert!(sandbox.remove_edge(&EdgeId::new("e0")));
        assert!(sandbox.engine().signals().is_empty());
        assert_eq!(sandbox.engine().stats().signals_dropped, 1);
    }

    #[test]
    fn canvas_press_clears_selection() {
        let mut sandbox = quiet(pair());
        sandbox.select_node(Some(NodeId::new("a")));
        assert!(sandbox.snapshot().highlight.is_some());

        sandbox.pointer(PointerEvent::Down {
            id: PointerId(1),
            x: 10.0,
            y: 10.0,
        });
        assert!(sandbox.store().selected().is_none());
    }

    #[test]
    fn drag_pans_view() {
        let mut sandbox = quiet(pair());
        let before = sandbox.viewport();

        sandbox.pointer(PointerEvent::Down { id: PointerId(1), x: 0.0, y: 0.0 });
        sandbox.pointer(PointerEvent::Move { id: PointerId(1), x: 30.0, y: -10.0 });
        sandbox.pointer(PointerEvent::Up { id: PointerId(1) });

        let after = sandbox.viewport();
        assert_eq!(after.x, before.x + 30.0);
        assert_eq!(after.y, before.y - 10.0);

        sandbox.center_view();
        assert_eq!(sandbox.viewport(), Viewport::centered(800.0, 600.0));
    }

    #[test]
    fn context_round_trip() {
        let mut sandbox = quiet(pair());
        let b = NodeId::new("b");
        let entry = sandbox.inject_context(&b, "  remember the refund policy ").unwrap();

        let latest = sandbox
            .store()
            .runtime(&b)
            .and_then(|rt| rt.context.latest())
            .cloned()
            .unwrap();
        assert_eq!(latest.kind, EntryKind::User);
        assert_eq!(latest.content, "remember the refund policy");

        assert!(sandbox.remove_context(&b, entry));
        assert!(sandbox.inject_context(&b, "   ").is_none());
    }

    #[test]
    fn config_field_edit() {
        let mut sandbox = quiet(pair());
        let a = NodeId::new("a");
        sandbox.update_config(&a, "---\ntype: trigger\n---\n\nbody");
        sandbox.set_config_field(&a, "status", "paused");

        let config = sandbox.store().config(&a).unwrap();
        assert_eq!(config.field("status"), Some("paused"));
        assert_eq!(config.field("type"), Some("trigger"));
        assert_eq!(config.body, "body");
    }

    #[test]
    fn demo_sandbox_loads() {
        let sandbox = Sandbox::demo(EngineConfig::default(), 1280.0, 800.0).unwrap();
        assert_eq!(sandbox.store().node_count(), 11);
        assert_eq!(sandbox.viewport(), Viewport::demo(1280.0, 800.0));
    }
}
