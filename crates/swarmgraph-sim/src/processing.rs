//! Nodes currently pulsing after receiving or emitting a signal.

use std::collections::HashMap;

use swarmgraph_graph::NodeId;

/// Node id to pulse deadline on the engine clock (ms).
///
/// A node is processing while `now < deadline`. Flagging again replaces the
/// deadline, so overlapping pulses extend rather than stack.
#[derive(Debug, Clone, Default)]
pub struct ProcessingSet {
    deadlines: HashMap<NodeId, f64>,
}

impl ProcessingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as processing for `pulse_ms` starting at `now`.
    pub fn flag(&mut self, id: NodeId, now: f64, pulse_ms: f64) {
        self.deadlines.insert(id, now + pulse_ms);
    }

    pub fn is_processing(&self, id: &NodeId, now: f64) -> bool {
        self.deadlines.get(id).is_some_and(|&deadline| now < deadline)
    }

    /// Drop every pulse whose deadline has passed. Returns how many ended.
    pub fn expire(&mut self, now: f64) -> usize {
        let before = self.deadlines.len();
        self.deadlines.retain(|_, deadline| now < *deadline);
        before - self.deadlines.len()
    }

    /// Ids processing at `now`, sorted for stable output.
    pub fn active(&self, now: f64) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .deadlines
            .iter()
            .filter(|(_, &deadline)| now < deadline)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn remove(&mut self, id: &NodeId) {
        self.deadlines.remove(id);
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
