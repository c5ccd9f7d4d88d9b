//! Swarmgraph Graph Store
//!
//! The typed node graph that signals travel through, plus the mutable state
//! each node carries.
//!
//! # Model
//!
//! - **Nodes** have a fixed [`NodeKind`]; `trigger` nodes originate signals,
//!   `output` nodes absorb them, everything else relays.
//! - **Edges** are directed; parallel edges are distinct relay paths.
//! - **Runtime state** per node: free-text configuration in the
//!   [`NodeConfig`] format and a bounded, newest-first [`ContextLog`].
//!
//! Structural changes (`insert_*`, `add_edge`) are validated and return
//! [`Error`]. Runtime mutations on unknown ids are no-ops.

mod config;
mod context;
mod document;
mod error;
mod store;
mod types;

pub use config::{stringify, NodeConfig};
pub use context::{ContextEntry, ContextLog, EntryDraft, EntryId, EntryKind, CONTEXT_CAPACITY};
pub use document::GraphDocument;
pub use error::{Error, Result};
pub use store::{Connections, GraphStore, NodeRuntime};
pub use types::{Color, Edge, EdgeId, Node, NodeId, NodeKind};
