//! Shared fixtures for cross-crate scenario tests.

use swarmgraph_graph::{Edge, GraphStore, Node, NodeKind, Result};
use swarmgraph_sim::{EngineConfig, ManualScheduler, Sandbox, ScriptedRandom, SimulationEngine};

/// 16 ms frames at this rate cover a quarter of an edge.
pub const QUARTER_PER_FRAME: f64 = 0.015625;

/// Frame length used with [`QUARTER_PER_FRAME`].
pub const FRAME_MS: f64 = 16.0;

/// A(trigger) -> B(agent) -> C(output), edges `ab` and `bc`.
pub fn chain() -> Result<GraphStore> {
    let mut store = GraphStore::new();
    store.insert_node(Node::new("a", NodeKind::Trigger, "A", 0.0, 0.0))?;
    store.insert_node(Node::new("b", NodeKind::Agent, "B", 0.0, 150.0))?;
    store.insert_node(Node::new("c", NodeKind::Output, "C", 0.0, 300.0))?;
    store.insert_edge(Edge::new("ab", "a", "b"))?;
    store.insert_edge(Edge::new("bc", "b", "c"))?;
    Ok(store)
}

/// Engine settings where triggers never fire on their own.
pub fn quiet_config(progress_per_ms: f64) -> EngineConfig {
    EngineConfig {
        progress_per_ms,
        spawn_rate: 0.0,
        ..Default::default()
    }
}

/// Sandbox over `store` with deterministic draws and a manual frame source.
pub fn scripted_sandbox(
    store: GraphStore,
    config: EngineConfig,
    draws: &[f64],
) -> Sandbox<ManualScheduler, ScriptedRandom> {
    let engine = SimulationEngine::with_random(config, ScriptedRandom::new(draws.iter().copied()));
    Sandbox::with_parts(store, engine, ManualScheduler::new(), 1280.0, 800.0)
}

/// Deliver `count` frames `FRAME_MS` apart after a baseline frame.
pub fn run_frames<S, R>(sandbox: &mut Sandbox<S, R>, count: usize)
where
    S: swarmgraph_sim::FrameScheduler,
    R: swarmgraph_sim::RandomSource,
{
    let start = sandbox.engine().clock_ms();
    sandbox.on_frame(start);
    for i in 1..=count {
        sandbox.on_frame(start + i as f64 * FRAME_MS);
    }
}
