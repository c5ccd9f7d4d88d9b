//! Signals in flight along edges.

use serde::{Deserialize, Serialize};
use swarmgraph_graph::{Color, EdgeId};

/// Slack on the arrival check so that `k` steps of `1/k` land on tick `k`
/// despite rounding in the summed progress.
pub const ARRIVAL_EPSILON: f64 = 8.0 * f64::EPSILON;

/// Identifier of a live signal, unique within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalId(pub u64);

/// What a signal carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Label of the node that emitted the signal
    pub source: String,
    pub data: String,
}

impl Payload {
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
        }
    }
}

/// A signal traveling along one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    pub edge: EdgeId,
    /// Progress along the edge (0.0 = source, 1.0 = target)
    pub progress: f64,
    pub color: Color,
    pub payload: Payload,
}

impl Signal {
    /// Create a signal at the start of `edge`.
    pub fn new(id: SignalId, edge: EdgeId, color: Color, payload: Payload) -> Self {
        Self {
            id,
            edge,
            progress: 0.0,
            color,
            payload,
        }
    }

    /// Check if the signal has reached its target.
    pub fn arrived(&self) -> bool {
        self.progress >= 1.0 - ARRIVAL_EPSILON
    }
}
