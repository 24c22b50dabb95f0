use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dynamics::state::EnvironmentConfig;
use crate::error::{Result, TuneError};
use super::autotune::{search, ScoredGainSet, TuneConfig, TuneOutcome};

// ---------------------------------------------------------------------------
// Background autotune task
// ---------------------------------------------------------------------------

/// Progress messages emitted by an [`AutotuneJob`].
///
/// Exactly one of `Complete`, `Cancelled` or `Failed` ends the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum TuneStatus {
    Started { total: usize },
    InProgress {
        completed: usize,
        total: usize,
        best_score: Option<f64>,
    },
    Complete { best: ScoredGainSet, final_score: f64 },
    Cancelled {
        completed: usize,
        best: Option<ScoredGainSet>,
    },
    Failed { reason: String },
}

impl TuneStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TuneStatus::Complete { .. } | TuneStatus::Cancelled { .. } | TuneStatus::Failed { .. }
        )
    }
}

/// An autotune search running on its own thread.
///
/// Dropping the job cancels it: no new samples start, and the thread exits
/// once the samples already running finish.
pub struct AutotuneJob {
    cancel: Arc<AtomicBool>,
    status: Receiver<TuneStatus>,
    handle: Option<JoinHandle<Result<TuneOutcome>>>,
}

impl AutotuneJob {
    /// Validate the configuration and start searching in the background.
    ///
    /// `seed` makes the search reproducible; `None` seeds from OS entropy.
    pub fn spawn(env: EnvironmentConfig, config: TuneConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        config.search_environment(&env).validate()?;

        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, status) = channel::unbounded();
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("autotune".into())
            .spawn(move || run_job(env, config, seed, &flag, tx))?;

        Ok(Self { cancel, status, handle: Some(handle) })
    }

    /// Status stream; ends after the terminal message.
    pub fn status(&self) -> &Receiver<TuneStatus> {
        &self.status
    }

    /// Stop starting new samples. Samples already running finish.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait for the search to end.
    pub fn join(mut self) -> Result<TuneOutcome> {
        let handle = self.handle.take().ok_or(TuneError::WorkerPanicked)?;
        handle.join().map_err(|_| TuneError::WorkerPanicked)?
    }
}

impl Drop for AutotuneJob {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
        }
    }
}

fn run_job(
    env: EnvironmentConfig,
    config: TuneConfig,
    seed: Option<u64>,
    cancel: &AtomicBool,
    tx: Sender<TuneStatus>,
) -> Result<TuneOutcome> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let total = config.samples;
    // A dropped receiver just means nobody is listening.
    let _ = tx.send(TuneStatus::Started { total });

    let result = search(&env, &config, &mut rng, cancel, |completed, best| {
        let _ = tx.send(TuneStatus::InProgress {
            completed,
            total,
            best_score: best.map(|b| b.score),
        });
    });

    let terminal = match &result {
        Ok(TuneOutcome::Complete(best)) => TuneStatus::Complete { best: *best, final_score: best.score },
        Ok(TuneOutcome::Cancelled { completed, best }) => TuneStatus::Cancelled { completed: *completed, best: *best },
        Err(e) => TuneStatus::Failed { reason: e.to_string() },
    };
    let _ = tx.send(terminal);
    result
}
