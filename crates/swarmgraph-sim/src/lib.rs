//! Swarmgraph Simulation
//!
//! Frame-driven signal propagation over a [`swarmgraph_graph::GraphStore`].
//!
//! # Model
//!
//! - **Signals** travel along edges with a progress in `[0, 1)`. On arrival
//!   the target node pulses, logs an ingest entry and relays one new signal
//!   per outgoing edge unless it is an `output`.
//! - **Triggers** fire at random, scaled by frame length, through an
//!   injectable [`RandomSource`].
//! - **Frames** come from the host via a [`FrameScheduler`]; [`FrameLoop`]
//!   turns timestamps into tick deltas.
//!
//! [`Sandbox`] bundles one graph, its engine, its viewport and its frame loop.

mod config;
mod engine;
mod error;
mod processing;
mod random;
mod sandbox;
mod scheduler;
mod signal;
mod snapshot;

pub use config::EngineConfig;
pub use engine::{ingest_message, EngineState, SimulationEngine, SimulationStats, TickReport};
pub use error::{Error, Result};
pub use processing::ProcessingSet;
pub use random::{seeded, RandomSource, ScriptedRandom, StdRng};
pub use sandbox::Sandbox;
pub use scheduler::{FrameHandle, FrameLoop, FrameScheduler, ManualScheduler};
pub use signal::{Payload, Signal, SignalId, ARRIVAL_EPSILON};
pub use snapshot::{EdgeView, FrameSnapshot, SignalView};
