use rand::Rng;

use super::state::{EnvironmentConfig, SimulationState};

// ---------------------------------------------------------------------------
// Vertical point-mass plant, semi-implicit Euler
// ---------------------------------------------------------------------------

/// Draw one wind sample, `magnitude * U(-1, 1)`.
///
/// A zero magnitude returns 0 without touching the random source, so a calm
/// run is fully deterministic whatever source is supplied.
pub fn sample_disturbance<R: Rng + ?Sized>(magnitude: f64, rng: &mut R) -> f64 {
    if magnitude == 0.0 {
        return 0.0;
    }
    magnitude * rng.gen_range(-1.0..1.0)
}

/// Net vertical acceleration from thrust, gravity and wind.
pub fn acceleration(force: f64, env: &EnvironmentConfig, disturbance: f64) -> f64 {
    force / env.mass - env.gravity + disturbance
}

/// Advance position and velocity by one timestep.
///
/// Velocity is updated first and the new velocity drives the position update.
pub fn step(state: &mut SimulationState, force: f64, env: &EnvironmentConfig, disturbance: f64) {
    let accel = acceleration(force, env, disturbance);
    state.velocity += accel * env.dt;
    state.position += state.velocity * env.dt;
}
