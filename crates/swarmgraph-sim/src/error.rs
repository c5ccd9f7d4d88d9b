//! Error types for swarmgraph-sim.

use thiserror::Error;

/// Result type for simulation setup.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a simulation.
///
/// Ticking never fails; dangling signals are dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed engine configuration
    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),

    /// Graph construction failed
    #[error(transparent)]
    Graph(#[from] swarmgraph_graph::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
