use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::dynamics::state::EnvironmentConfig;
use crate::error::Result;
use crate::gnc::GainSet;
use crate::sim::{Metrics, SimulationRun};
use crate::tune::ScoredGainSet;

/// Headline numbers for one run, suitable for export.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub gains: GainSet,
    pub environment: EnvironmentConfig,
    pub metrics: Metrics,
    pub score: f64,
    pub samples: usize,
}

impl RunSummary {
    pub fn from_run(gains: &GainSet, env: &EnvironmentConfig, run: &SimulationRun) -> Self {
        RunSummary {
            gains: *gains,
            environment: *env,
            metrics: run.metrics,
            score: run.score(),
            samples: run.records.len(),
        }
    }
}

/// Write a run summary as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_summary_file(path: impl AsRef<Path>, summary: &RunSummary) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

/// Write a tuning result as pretty JSON.
pub fn write_tuning<W: Write>(writer: &mut W, best: &ScoredGainSet) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, best)?;
    writeln!(writer)?;
    Ok(())
}
