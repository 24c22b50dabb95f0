use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dynamics::plant;
use crate::dynamics::state::{EnvironmentConfig, SimulationState};
use crate::error::Result;
use crate::gnc::GainSet;
use super::metrics::{extract_metrics, Metrics};
use super::score::compute_score;

// ---------------------------------------------------------------------------
// Time series output
// ---------------------------------------------------------------------------

/// One sample of the closed-loop response.
///
/// `position` is the altitude after the plant step at `time`; `error` and
/// `control` are the values the controller computed at the start of that step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub time: f64,
    pub position: f64,
    pub setpoint: f64,
    pub control: f64,
    pub error: f64,
}

/// A completed run: the full record sequence and its metrics.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub records: Vec<SampleRecord>,
    pub metrics: Metrics,
}

impl SimulationRun {
    pub fn score(&self) -> f64 {
        compute_score(&self.metrics)
    }
}

// ---------------------------------------------------------------------------
// Closed-loop simulation
// ---------------------------------------------------------------------------

/// Step the controller and plant for `env.step_count()` steps.
///
/// State starts at rest at altitude zero. The random source is consumed only
/// for wind samples, so a calm environment never reads it.
pub fn simulate_with<R: Rng + ?Sized>(
    gains: &GainSet,
    env: &EnvironmentConfig,
    rng: &mut R,
) -> Result<Vec<SampleRecord>> {
    env.validate()?;
    gains.validate()?;

    let steps = env.step_count();
    let baseline = env.baseline_force();
    let mut state = SimulationState::default();
    let mut records = Vec::with_capacity(steps);

    for i in 0..steps {
        let time = i as f64 * env.dt;
        let error = env.setpoint - state.position;

        let out = gains.update(error, state.integral, state.prev_error, env.dt, baseline);
        state.integral = out.integral;
        state.prev_error = out.error;

        let wind = plant::sample_disturbance(env.disturbance, rng);
        plant::step(&mut state, out.control, env, wind);

        records.push(SampleRecord {
            time,
            position: state.position,
            setpoint: env.setpoint,
            control: out.control,
            error,
        });
    }

    debug!(
        "simulated {} steps (kp={:.3} ki={:.3} kd={:.3}), final altitude {:.4}",
        steps, gains.kp, gains.ki, gains.kd, state.position
    );
    Ok(records)
}

/// Run with a caller-supplied random source and extract metrics.
pub fn run_simulation_with<R: Rng + ?Sized>(
    gains: &GainSet,
    env: &EnvironmentConfig,
    rng: &mut R,
) -> Result<SimulationRun> {
    let records = simulate_with(gains, env, rng)?;
    let metrics = extract_metrics(&records, env.setpoint, env.horizon);
    Ok(SimulationRun { records, metrics })
}

/// Run with a nondeterministic thread-local random source (interactive use).
pub fn run_simulation(gains: &GainSet, env: &EnvironmentConfig) -> Result<SimulationRun> {
    run_simulation_with(gains, env, &mut rand::thread_rng())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
