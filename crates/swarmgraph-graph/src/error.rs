//! Error types for graph construction and import.

use thiserror::Error;

use crate::types::{EdgeId, NodeId};

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or loading a graph.
///
/// Runtime mutations (selection, config edits, context) never fail; only
/// structural changes are validated.
#[derive(Debug, Error)]
pub enum Error {
    /// An edge endpoint does not exist
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A node with this id is already present
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// An edge with this id is already present
    #[error("duplicate edge id: {0}")]
    DuplicateEdge(EdgeId),

    /// Source and target are the same node
    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    /// Malformed graph document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
