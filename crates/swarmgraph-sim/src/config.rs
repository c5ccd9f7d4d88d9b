//! Engine tuning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Simulation parameters. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Edge progress gained per millisecond
    pub progress_per_ms: f64,
    /// Trigger spawn probability per reference frame
    pub spawn_rate: f64,
    /// Frame length the spawn rate is calibrated against (ms)
    pub reference_frame_ms: f64,
    /// How long a node stays processing after a signal (ms)
    pub pulse_ms: f64,
    /// Seed for the default random source
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            progress_per_ms: 0.0005,
            spawn_rate: 0.08,
            reference_frame_ms: 16.66,
            pulse_ms: 300.0,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Progress every live signal gains over `delta_ms`.
    pub fn progress_delta(&self, delta_ms: f64) -> f64 {
        delta_ms * self.progress_per_ms
    }

    /// Chance that a trigger fires during a frame of `delta_ms`.
    pub fn spawn_probability(&self, delta_ms: f64) -> f64 {
        if self.reference_frame_ms <= 0.0 {
            return 0.0;
        }
        self.spawn_rate * (delta_ms / self.reference_frame_ms)
    }
}
