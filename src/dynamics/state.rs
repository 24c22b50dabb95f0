use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, Result, TuneError};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

/// Gravitational acceleration used by the default environment, m/s^2.
pub const G0: f64 = 9.81;

/// Upper limit on `floor(horizon / dt)` for a single run.
pub const MAX_STEPS: usize = 10_000_000;

// ---------------------------------------------------------------------------
// Environment: immutable per run
// ---------------------------------------------------------------------------

/// Plant and horizon parameters for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub setpoint: f64,              // target altitude, m
    pub mass: f64,                  // kg
    pub gravity: f64,               // m/s^2, acts downward
    pub disturbance: f64,           // peak wind acceleration, m/s^2
    pub dt: f64,                    // integration timestep, s
    pub horizon: f64,               // simulated duration, s
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            setpoint: 10.0,
            mass: 1.0,
            gravity: G0,
            disturbance: 0.0,
            dt: 0.01,       // 100 Hz
            horizon: 10.0,
        }
    }
}

impl EnvironmentConfig {
    /// Fail fast on anything that would make a run produce NaN/Inf records.
    pub fn validate(&self) -> Result<()> {
        require_positive("dt", self.dt)?;
        require_positive("horizon", self.horizon)?;
        require_positive("setpoint", self.setpoint)?;
        require_positive("mass", self.mass)?;
        if !self.gravity.is_finite() {
            return Err(TuneError::invalid("gravity", self.gravity, "must be finite"));
        }
        if !self.disturbance.is_finite() {
            return Err(TuneError::invalid("disturbance", self.disturbance, "must be finite"));
        }
        let ratio = self.horizon / self.dt;
        if !ratio.is_finite() || ratio.floor() > MAX_STEPS as f64 {
            return Err(TuneError::invalid("horizon", self.horizon, "exceeds the per-run step limit"));
        }
        if self.step_count() == 0 {
            return Err(TuneError::invalid("horizon", self.horizon, "shorter than one timestep"));
        }
        Ok(())
    }

    /// Number of records a run produces: `floor(horizon / dt)`.
    pub fn step_count(&self) -> usize {
        (self.horizon / self.dt).floor() as usize
    }

    /// Feed-forward force that exactly cancels the static load (m * g).
    pub fn baseline_force(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let env: EnvironmentConfig = serde_json::from_str(json)?;
        env.validate()?;
        Ok(env)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Mutable state owned by a single run
// ---------------------------------------------------------------------------

/// Plant and controller memory carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationState {
    pub position: f64,              // m
    pub velocity: f64,              // m/s
    pub integral: f64,              // accumulated error * s, never clamped
    pub prev_error: f64,            // error at the previous step, 0 before step 0
}
