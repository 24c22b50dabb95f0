use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam::channel;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dynamics::state::EnvironmentConfig;
use crate::error::{require_positive, Result, TuneError};
use crate::gnc::GainSet;
use crate::sim::{run_simulation_with, ScoreWeights};
use super::bounds::SearchBounds;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Random-search settings.
///
/// The search horizon is fixed here and independent of the horizon of the
/// caller's environment; only setpoint, mass, gravity and disturbance are
/// taken from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuneConfig {
    pub samples: usize,
    pub horizon: f64,               // s
    pub dt: f64,                    // s
    pub bounds: SearchBounds,
    pub weights: ScoreWeights,
    pub workers: usize,             // 0 = one per available core
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            horizon: 10.0,
            dt: 0.01,
            bounds: SearchBounds::default(),
            weights: ScoreWeights::default(),
            workers: 0,
        }
    }
}

impl TuneConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(TuneError::invalid("samples", 0.0, "at least one sample is required"));
        }
        require_positive("tune horizon", self.horizon)?;
        require_positive("tune dt", self.dt)?;
        self.bounds.validate()
    }

    /// The caller's plant with this search's timestep and horizon.
    pub fn search_environment(&self, env: &EnvironmentConfig) -> EnvironmentConfig {
        EnvironmentConfig { dt: self.dt, horizon: self.horizon, ..*env }
    }

    fn worker_count(&self) -> usize {
        let n = if self.workers == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            self.workers
        };
        n.clamp(1, self.samples.max(1))
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A gain set together with the score it achieved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredGainSet {
    pub gains: GainSet,
    pub score: f64,
}

/// Commit a tuning result as the active gains.
pub fn apply_gains(best: &ScoredGainSet) -> GainSet {
    best.gains
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TuneOutcome {
    Complete(ScoredGainSet),
    Cancelled {
        completed: usize,
        best: Option<ScoredGainSet>,
    },
}

impl TuneOutcome {
    pub fn best(&self) -> Option<&ScoredGainSet> {
        match self {
            TuneOutcome::Complete(best) => Some(best),
            TuneOutcome::Cancelled { best, .. } => best.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

struct Candidate {
    index: usize,
    gains: GainSet,
    seed: u64,
}

struct Evaluation {
    index: usize,
    gains: GainSet,
    score: f64,
}

fn evaluate(c: &Candidate, env: &EnvironmentConfig, weights: &ScoreWeights) -> Result<Evaluation> {
    // Every candidate flies through its own wind sequence.
    let mut rng = StdRng::seed_from_u64(c.seed);
    let run = run_simulation_with(&c.gains, env, &mut rng)?;
    Ok(Evaluation { index: c.index, gains: c.gains, score: weights.score(&run.metrics) })
}

/// Fixed-budget random search with cancellation and progress reporting.
///
/// All candidates and their wind seeds are drawn from `rng` up front in sample
/// order, then evaluated by a pool of worker threads. The collecting thread
/// keeps the lowest score, breaking ties in favour of the earlier sample, so a
/// seeded search gives the same answer for any worker count. `cancel` is
/// checked before each sample starts; `on_progress` receives the number of
/// finished samples and the best result so far.
pub fn search<R, F>(
    env: &EnvironmentConfig,
    config: &TuneConfig,
    rng: &mut R,
    cancel: &AtomicBool,
    mut on_progress: F,
) -> Result<TuneOutcome>
where
    R: Rng + ?Sized,
    F: FnMut(usize, Option<&ScoredGainSet>),
{
    config.validate()?;
    let env = config.search_environment(env);
    env.validate()?;

    let total = config.samples;
    let workers = config.worker_count();
    let weights = config.weights;
    info!(
        "autotune: {} samples on {} workers (setpoint {:.2}, wind {:.2})",
        total, workers, env.setpoint, env.disturbance
    );

    let candidates: Vec<Candidate> = (0..total)
        .map(|index| {
            let gains = config.bounds.sample(rng);
            let seed = rng.gen();
            Candidate { index, gains, seed }
        })
        .collect();

    let (job_tx, job_rx) = channel::unbounded::<Candidate>();
    let (res_tx, res_rx) = channel::unbounded::<Result<Evaluation>>();

    let mut best: Option<(usize, ScoredGainSet)> = None;
    let mut completed = 0;
    let mut failure = None;

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let res_tx = res_tx.clone();
            let env = &env;
            scope.spawn(move || {
                for c in job_rx.iter() {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    if res_tx.send(evaluate(&c, env, &weights)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(res_tx);

        for c in candidates {
            // Receivers only disappear once every worker has exited.
            if job_tx.send(c).is_err() {
                break;
            }
        }
        drop(job_tx);

        for res in res_rx.iter() {
            let eval = match res {
                Ok(eval) => eval,
                Err(e) => {
                    cancel.store(true, Ordering::Relaxed);
                    failure.get_or_insert(e);
                    continue;
                }
            };
            completed += 1;

            let better = match &best {
                None => !eval.score.is_nan(),
                Some((idx, b)) => eval.score < b.score || (eval.score == b.score && eval.index < *idx),
            };
            if better {
                debug!(
                    "autotune: sample {} new best {:.4} (kp={:.3} ki={:.3} kd={:.3})",
                    eval.index, eval.score, eval.gains.kp, eval.gains.ki, eval.gains.kd
                );
                best = Some((eval.index, ScoredGainSet { gains: eval.gains, score: eval.score }));
            }
            on_progress(completed, best.as_ref().map(|(_, b)| b));
        }
    });

    if let Some(e) = failure {
        return Err(e);
    }

    let best = best.map(|(_, b)| b);
    if completed < total {
        warn!("autotune: cancelled after {}/{} samples", completed, total);
        return Ok(TuneOutcome::Cancelled { completed, best });
    }

    let best = best.ok_or(TuneError::invalid(
        "samples",
        total as f64,
        "no candidate produced a comparable score",
    ))?;
    info!(
        "autotune: best score {:.4} at kp={:.3} ki={:.3} kd={:.3}",
        best.score, best.gains.kp, best.gains.ki, best.gains.kd
    );
    Ok(TuneOutcome::Complete(best))
}

/// Run the whole search on the calling thread's budget and return the winner.
pub fn autotune<R: Rng + ?Sized>(
    env: &EnvironmentConfig,
    config: &TuneConfig,
    rng: &mut R,
) -> Result<ScoredGainSet> {
    let never = AtomicBool::new(false);
    match search(env, config, rng, &never, |_, _| {})? {
        TuneOutcome::Complete(best) => Ok(best),
        TuneOutcome::Cancelled { completed, .. } => Err(TuneError::invalid(
            "samples",
            completed as f64,
            "search stopped before the sample budget was spent",
        )),
    }
}
