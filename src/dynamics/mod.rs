pub mod plant;
pub mod state;

pub use state::{EnvironmentConfig, SimulationState, G0, MAX_STEPS};
