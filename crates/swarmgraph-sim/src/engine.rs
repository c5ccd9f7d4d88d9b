//! The signal simulation engine.
//!
//! Each tick advances every live signal along its edge, fans arrivals out
//! across the target's outgoing edges and occasionally fires a trigger.
//! The engine reads the [`GraphStore`] and only writes to it through
//! [`GraphStore::append_context`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use swarmgraph_graph::{Color, EdgeId, EntryDraft, GraphStore, NodeId};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::processing::ProcessingSet;
use crate::random::{seeded, RandomSource, StdRng};
use crate::signal::{Payload, Signal, SignalId};

const RELAY_DATA: &str = "Transformed Payload";
const TRIGGER_DATA: &str = "Init Event";
const INJECT_DATA: &str = "Manual Event";

/// Context line written when a signal reaches a node.
pub fn ingest_message(source: &str) -> String {
    format!("[INGEST] Vector packet processed from {source}")
}

/// Whether the engine advances on tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Stopped,
    Running,
}

/// Counters accumulated across ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Ticks processed while running
    pub ticks: u64,
    /// Signals created (relays, trigger fires, injections)
    pub signals_spawned: u64,
    /// Signals that reached their target
    pub signals_delivered: u64,
    /// Signals whose edge disappeared under them
    pub signals_dropped: u64,
    /// Trigger nodes fired
    pub trigger_fires: u64,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub progress_delta: f64,
    pub arrived: usize,
    pub spawned: usize,
    pub dropped: usize,
    /// Trigger fired by the random spawn, if any
    pub fired: Option<NodeId>,
    /// Signals in flight after the tick
    pub live: usize,
}

/// Signal simulation for one graph instance.
pub struct SimulationEngine<R = StdRng> {
    config: EngineConfig,
    state: EngineState,
    signals: Vec<Signal>,
    processing: ProcessingSet,
    clock_ms: f64,
    next_signal: u64,
    stats: SimulationStats,
    rng: R,
}

impl SimulationEngine<StdRng> {
    /// Create an engine drawing from a generator seeded with `config.seed`.
    pub fn new(config: EngineConfig) -> Self {
        let rng = seeded(config.seed);
        Self::with_random(config, rng)
    }
}

impl Default for SimulationEngine<StdRng> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<R: RandomSource> SimulationEngine<R> {
    pub fn with_random(config: EngineConfig, rng: R) -> Self {
        Self {
            config,
            state: EngineState::Stopped,
            signals: Vec::new(),
            processing: ProcessingSet::new(),
            clock_ms: 0.0,
            next_signal: 0,
            stats: SimulationStats::default(),
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Begin running from a clean slate.
    pub fn start(&mut self) {
        self.clear_transient();
        self.state = EngineState::Running;
        debug!(clock_ms = self.clock_ms, "simulation started");
    }

    /// Halt and discard everything in flight.
    pub fn stop(&mut self) {
        self.clear_transient();
        self.state = EngineState::Stopped;
        debug!(clock_ms = self.clock_ms, "simulation stopped");
    }

    fn clear_transient(&mut self) {
        self.signals.clear();
        self.processing.clear();
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn is_processing(&self, id: &NodeId) -> bool {
        self.processing.is_processing(id, self.clock_ms)
    }

    /// Nodes pulsing at the current clock, sorted by id.
    pub fn processing(&self) -> Vec<NodeId> {
        self.processing.active(self.clock_ms)
    }

    /// Forget the pulse of a node that left the graph.
    pub fn forget_node(&mut self, id: &NodeId) {
        self.processing.remove(id);
    }

    fn spawn(&mut self, edge: EdgeId, color: Color, payload: Payload) -> SignalId {
        let id = SignalId(self.next_signal);
        self.next_signal += 1;
        self.signals.push(Signal::new(id, edge, color, payload));
        self.stats.signals_spawned += 1;
        id
    }

    /// Put a signal on `edge` directly, colored after its source node.
    ///
    /// Returns `None` if the edge does not resolve.
    pub fn inject(&mut self, edge: &EdgeId, store: &GraphStore) -> Option<SignalId> {
        let (_, source, _) = store.resolve_edge(edge)?;
        let payload = Payload::new(source.label.clone(), INJECT_DATA);
        let id = self.spawn(edge.clone(), source.kind.accent(), payload);
        trace!(signal = id.0, %edge, "injected signal");
        Some(id)
    }

    /// Fire a trigger node: flag it and emit one signal per outgoing edge.
    ///
    /// Returns the number of signals spawned. Non-trigger ids are ignored.
    pub fn fire_trigger(&mut self, id: &NodeId, store: &GraphStore) -> usize {
        let Some(node) = store.node(id).filter(|n| n.kind.is_trigger()) else {
            debug!(node = %id, "fire_trigger on unknown or non-trigger node");
            return 0;
        };

        self.processing
            .flag(node.id.clone(), self.clock_ms, self.config.pulse_ms);
        self.stats.trigger_fires += 1;

        let mut spawned = 0;
        for edge in store.outgoing(id) {
            self.spawn(
                edge.id.clone(),
                Color::BRIGHT,
                Payload::new(node.label.clone(), TRIGGER_DATA),
            );
            spawned += 1;
        }
        trace!(node = %id, spawned, "trigger fired");
        spawned
    }

    /// Drop signals whose edge or endpoints no longer exist.
    pub fn prune_dangling(&mut self, store: &GraphStore) -> usize {
        let before = self.signals.len();
        self.signals.retain(|s| store.resolve_edge(&s.edge).is_some());
        let dropped = before - self.signals.len();
        if dropped > 0 {
            self.stats.signals_dropped += dropped as u64;
            trace!(dropped, "pruned dangling signals");
        }
        dropped
    }

    /// Advance the simulation by `delta_ms`. A no-op while stopped.
    pub fn tick(&mut self, delta_ms: f64, store: &mut GraphStore) -> TickReport {
        if !self.is_running() {
            return TickReport::default();
        }

        let delta_ms = delta_ms.max(0.0);
        let progress_delta = self.config.progress_delta(delta_ms);
        self.clock_ms += delta_ms;
        self.processing.expire(self.clock_ms);
        self.stats.ticks += 1;

        let mut report = TickReport {
            progress_delta,
            ..Default::default()
        };

        // Advance
        let mut arrivals = Vec::new();
        for mut signal in std::mem::take(&mut self.signals) {
            if store.resolve_edge(&signal.edge).is_none() {
                trace!(signal = signal.id.0, edge = %signal.edge, "dropping dangling signal");
                report.dropped += 1;
                continue;
            }
            signal.progress += progress_delta;
            if signal.arrived() {
                arrivals.push(signal);
            } else {
                self.signals.push(signal);
            }
        }

        // Fan out
        let mut ingest: IndexMap<NodeId, Vec<EntryDraft>> = IndexMap::new();
        for signal in arrivals {
            let Some((_, _, target)) = store.resolve_edge(&signal.edge) else {
                report.dropped += 1;
                continue;
            };
            report.arrived += 1;

            self.processing
                .flag(target.id.clone(), self.clock_ms, self.config.pulse_ms);
            ingest
                .entry(target.id.clone())
                .or_default()
                .push(EntryDraft::system(ingest_message(&signal.payload.source)));

            if target.kind.is_terminal() {
                continue;
            }
            let color = target.kind.accent();
            let payload = Payload::new(target.label.clone(), RELAY_DATA);
            for edge in store.outgoing(&target.id) {
                self.spawn(edge.id.clone(), color, payload.clone());
                report.spawned += 1;
            }
        }

        // Trigger spawn
        let p = self.config.spawn_probability(delta_ms);
        if self.rng.next_f64() < p {
            let triggers: Vec<NodeId> = store.triggers().map(|n| n.id.clone()).collect();
            if !triggers.is_empty() {
                let pick = ((self.rng.next_f64() * triggers.len() as f64) as usize)
                    .min(triggers.len() - 1);
                let id = triggers[pick].clone();
                report.spawned += self.fire_trigger(&id, store);
                report.fired = Some(id);
            }
        }

        for (id, batch) in ingest {
            store.append_context(&id, batch);
        }

        self.stats.signals_delivered += report.arrived as u64;
        self.stats.signals_dropped += report.dropped as u64;
        report.live = self.signals.len();

        trace!(
            clock_ms = self.clock_ms,
            arrived = report.arrived,
            spawned = report.spawned,
            dropped = report.dropped,
            live = report.live,
            "tick"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use swarmgraph_graph::{Edge, GraphDocument, Node, NodeKind};

    /// A(trigger) -> B(agent) -> C(output)
    fn chain() -> GraphStore {
        let mut store = GraphStore::new();
        store.insert_node(Node::new("a", NodeKind::Trigger, "A", 0.0, 0.0)).unwrap();
        store.insert_node(Node::new("b", NodeKind::Agent, "B", 0.0, 150.0)).unwrap();
        store.insert_node(Node::new("c", NodeKind::Output, "C", 0.0, 300.0)).unwrap();
        store.insert_edge(Edge::new("ab", "a", "b")).unwrap();
        store.insert_edge(Edge::new("bc", "b", "c")).unwrap();
        store
    }

    /// Running engine that never fires triggers on its own.
    fn quiet(progress_per_ms: f64) -> SimulationEngine<ScriptedRandom> {
        let config = EngineConfig {
            progress_per_ms,
            spawn_rate: 0.0,
            ..Default::default()
        };
        let mut engine = SimulationEngine::with_random(config, ScriptedRandom::silent());
        engine.start();
        engine
    }

    // 16ms at 1/64 per ms is exactly a quarter of an edge.
    const QUARTER: f64 = 0.015625;

    #[test]
    fn signal_arrives_after_ceil_inverse_delta_ticks() {
        let mut store = chain();
        let mut engine = quiet(QUARTER);
        engine.inject(&EdgeId::new("ab"), &store).unwrap();

        for _ in 0..3 {
            let report = engine.tick(16.0, &mut store);
            assert_eq!(report.arrived, 0);
            assert_eq!(report.progress_delta, 0.25);
        }
        let report = engine.tick(16.0, &mut store);
        assert_eq!(report.arrived, 1);
    }

    #[test]
    fn inexact_deltas_arrive_on_schedule() {
        for (delta, ticks) in [(0.1, 10), (0.3, 4), (0.7, 2), (0.05, 20), (0.01, 100)] {
            let mut store = chain();
            let mut engine = quiet(delta);
            engine.inject(&EdgeId::new("bc"), &store).unwrap();

            for _ in 1..ticks {
                assert_eq!(engine.tick(1.0, &mut store).arrived, 0, "delta {delta} arrived early");
            }
            assert_eq!(engine.tick(1.0, &mut store).arrived, 1, "delta {delta} arrived late");
        }
    }

    #[test]
    fn relay_through_chain() {
        let mut store = chain();
        let mut engine = quiet(QUARTER);
        let b = NodeId::new("b");
        let c = NodeId::new("c");
        engine.inject(&EdgeId::new("ab"), &store).unwrap();

        for _ in 0..4 {
            engine.tick(16.0, &mut store);
        }

        assert!(engine.is_processing(&b));
        let latest = store.runtime(&b).and_then(|rt| rt.context.latest()).unwrap();
        assert_eq!(latest.content, "[INGEST] Vector packet processed from A");

        assert_eq!(engine.signals().len(), 1);
        let relay = &engine.signals()[0];
        assert_eq!(relay.edge, EdgeId::new("bc"));
        assert_eq!(relay.progress, 0.0);
        assert_eq!(relay.color, NodeKind::Agent.accent());
        assert_eq!(relay.payload, Payload::new("B", "Transformed Payload"));

        for _ in 0..4 {
            engine.tick(16.0, &mut store);
        }

        // Output absorbs
        assert!(engine.signals().is_empty());
        assert!(engine.is_processing(&c));
        let latest = store.runtime(&c).and_then(|rt| rt.context.latest()).unwrap();
        assert_eq!(latest.content, "[INGEST] Vector packet processed from B");
        assert_eq!(engine.stats().signals_delivered, 2);
    }

    #[test]
    fn pulse_expires_after_pulse_ms() {
        let mut store = chain();
        let mut engine = quiet(QUARTER);
        let b = NodeId::new("b");
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        for _ in 0..4 {
            engine.tick(16.0, &mut store);
        }
        assert!(engine.is_processing(&b));

        engine.tick(299.0, &mut store);
        assert!(engine.is_processing(&b));
        engine.tick(1.0, &mut store);
        assert!(!engine.is_processing(&b));
    }

    #[test]
    fn fan_out_spawns_one_per_outgoing_edge() {
        let mut store = chain();
        store.insert_node(Node::new("d", NodeKind::Tool, "D", 0.0, 0.0)).unwrap();
        store.insert_edge(Edge::new("bd", "b", "d")).unwrap();
        store.insert_edge(Edge::new("bc2", "b", "c")).unwrap();

        let mut engine = quiet(0.0625);
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        let report = engine.tick(16.0, &mut store);

        assert_eq!(report.arrived, 1);
        assert_eq!(report.spawned, 3);
        let mut edges: Vec<&str> = engine.signals().iter().map(|s| s.edge.as_str()).collect();
        edges.sort();
        assert_eq!(edges, vec!["bc", "bc2", "bd"]);
    }

    #[test]
    fn terminal_node_spawns_nothing() {
        let mut store = chain();
        let mut engine = quiet(0.0625);
        engine.inject(&EdgeId::new("bc"), &store).unwrap();
        let report = engine.tick(16.0, &mut store);

        assert_eq!(report.arrived, 1);
        assert_eq!(report.spawned, 0);
        assert!(engine.signals().is_empty());
    }

    #[test]
    fn simultaneous_arrivals_each_log() {
        let mut store = chain();
        store.insert_edge(Edge::new("ac", "a", "c")).unwrap();
        let mut engine = quiet(0.0625);
        engine.inject(&EdgeId::new("bc"), &store).unwrap();
        engine.inject(&EdgeId::new("ac"), &store).unwrap();
        engine.tick(16.0, &mut store);

        let c = NodeId::new("c");
        assert_eq!(store.runtime(&c).map(|rt| rt.context.len()), Some(2));
        assert_eq!(engine.processing(), vec![c]);
    }

    #[test]
    fn tick_while_stopped_is_noop() {
        let mut store = chain();
        let mut engine = quiet(QUARTER);
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        engine.stop();
        engine.inject(&EdgeId::new("ab"), &store).unwrap();

        let report = engine.tick(16.0, &mut store);
        assert_eq!(report, TickReport::default());
        assert_eq!(engine.clock_ms(), 0.0);
        assert_eq!(engine.signals()[0].progress, 0.0);
    }

    #[test]
    fn stop_and_start_clear_transient_state() {
        let mut store = chain();
        let mut engine = quiet(0.0625);
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        engine.tick(16.0, &mut store);
        assert!(!engine.processing().is_empty());

        engine.stop();
        assert!(engine.signals().is_empty());
        assert!(engine.processing().is_empty());

        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        engine.start();
        assert!(engine.signals().is_empty());
        assert!(engine.is_running());
    }

    #[test]
    fn dangling_signal_is_dropped() {
        let mut store = chain();
        let mut engine = quiet(QUARTER);
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        store.remove_node(&NodeId::new("b"));

        let report = engine.tick(16.0, &mut store);
        assert_eq!(report.dropped, 1);
        assert!(engine.signals().is_empty());
        assert_eq!(engine.stats().signals_dropped, 1);
    }

    #[test]
    fn prune_dangling_drops_immediately() {
        let mut store = chain();
        let mut engine = quiet(QUARTER);
        engine.inject(&EdgeId::new("ab"), &store).unwrap();
        engine.inject(&EdgeId::new("bc"), &store).unwrap();
        store.remove_edge(&EdgeId::new("bc"));

        assert_eq!(engine.prune_dangling(&store), 1);
        assert_eq!(engine.signals().len(), 1);
    }

    #[test]
    fn inject_on_unknown_edge() {
        let store = chain();
        let mut engine = quiet(QUARTER);
        assert!(engine.inject(&EdgeId::new("zz"), &store).is_none());
    }

    #[test]
    fn scripted_draw_fires_trigger() {
        let mut store = chain();
        let config = EngineConfig {
            progress_per_ms: QUARTER,
            ..Default::default()
        };
        let mut engine = SimulationEngine::with_random(config, ScriptedRandom::new([0.0, 0.0]));
        engine.start();

        let report = engine.tick(16.0, &mut store);
        let a = NodeId::new("a");
        assert_eq!(report.fired, Some(a.clone()));
        assert_eq!(report.spawned, 1);
        assert!(engine.is_processing(&a));

        let signal = &engine.signals()[0];
        assert_eq!(signal.edge, EdgeId::new("ab"));
        assert_eq!(signal.color, Color::BRIGHT);
        assert_eq!(signal.payload, Payload::new("A", "Init Event"));
    }

    #[test]
    fn second_draw_picks_trigger() {
        let mut store = chain();
        store.insert_node(Node::new("t2", NodeKind::Trigger, "T2", 0.0, 0.0)).unwrap();
        let config = EngineConfig {
            progress_per_ms: QUARTER,
            ..Default::default()
        };
        let mut engine = SimulationEngine::with_random(config, ScriptedRandom::new([0.0, 0.75]));
        engine.start();

        let report = engine.tick(16.0, &mut store);
        assert_eq!(report.fired, Some(NodeId::new("t2")));
        // No outgoing edges, still pulses
        assert_eq!(report.spawned, 0);
        assert!(engine.is_processing(&NodeId::new("t2")));
    }

    #[test]
    fn draw_above_probability_does_not_fire() {
        let mut store = chain();
        let mut engine =
            SimulationEngine::with_random(EngineConfig::default(), ScriptedRandom::new([0.99]));
        engine.start();
        for _ in 0..10 {
            assert!(engine.tick(16.0, &mut store).fired.is_none());
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            let mut store = GraphStore::from_document(GraphDocument::demo()).unwrap();
            let mut engine = SimulationEngine::<StdRng>::default();
            engine.start();
            for _ in 0..600 {
                engine.tick(16.0, &mut store);
            }
            engine.stats().clone()
        };
        let first = run();
        assert_eq!(first, run());
        assert_eq!(first.ticks, 600);
    }
}
