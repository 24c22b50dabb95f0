pub mod metrics;
pub mod runner;
pub mod score;

pub use metrics::{extract_metrics, Metrics};
pub use runner::{run_simulation, run_simulation_with, simulate_with, SampleRecord, SimulationRun};
pub use score::{compute_score, ScoreWeights};
