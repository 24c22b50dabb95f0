pub mod autotune;
pub mod bounds;
pub mod job;

pub use autotune::{apply_gains, autotune, search, ScoredGainSet, TuneConfig, TuneOutcome};
pub use bounds::{GainRange, SearchBounds};
pub use job::{AutotuneJob, TuneStatus};
