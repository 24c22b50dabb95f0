pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod sim;
pub mod tune;

pub use error::{Result, TuneError};

// Flat re-exports for presentation-layer callers
pub mod types {
    pub use crate::dynamics::state::{EnvironmentConfig, SimulationState, G0};
    pub use crate::gnc::GainSet;
    pub use crate::sim::{Metrics, SampleRecord, ScoreWeights, SimulationRun};
    pub use crate::tune::{ScoredGainSet, SearchBounds, TuneConfig};
}

pub use sim::{compute_score, extract_metrics, run_simulation, run_simulation_with};
pub use tune::{apply_gains, autotune, AutotuneJob, TuneOutcome, TuneStatus};
