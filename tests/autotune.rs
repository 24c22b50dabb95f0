use rand::rngs::StdRng;
use rand::SeedableRng;

use hover_tune::sim::ScoreWeights;
use hover_tune::tune::{GainRange, SearchBounds};
use hover_tune::types::{EnvironmentConfig, TuneConfig};
use hover_tune::{apply_gains, autotune, compute_score, run_simulation_with, AutotuneJob, TuneOutcome, TuneStatus};

fn config(samples: usize) -> TuneConfig {
    TuneConfig { samples, horizon: 5.0, workers: 3, ..Default::default() }
}

#[test]
fn single_sample_respects_default_bounds() {
    let env = EnvironmentConfig { disturbance: 0.8, ..Default::default() };
    let best = autotune(&env, &config(1), &mut StdRng::seed_from_u64(10)).unwrap();
    let b = SearchBounds::default();
    assert!(b.kp.contains(best.gains.kp));
    assert!(b.ki.contains(best.gains.ki));
    assert!(b.kd.contains(best.gains.kd));
}

#[test]
fn scoring_is_consistent_with_independent_run() {
    let env = EnvironmentConfig::default();
    let cfg = config(1);
    let best = autotune(&env, &cfg, &mut StdRng::seed_from_u64(10)).unwrap();

    let run = run_simulation_with(&apply_gains(&best), &cfg.search_environment(&env), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(compute_score(&run.metrics), run.score());
    assert_eq!(best.score, run.score());
}

#[test]
fn seeded_search_is_reproducible() {
    let env = EnvironmentConfig { disturbance: 2.0, ..Default::default() };
    let a = autotune(&env, &config(20), &mut StdRng::seed_from_u64(2024)).unwrap();
    let b = autotune(&env, &config(20), &mut StdRng::seed_from_u64(2024)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn more_samples_never_score_worse_in_calm_air() {
    // The first 10 candidates of a 40-sample search are the 10-sample search.
    let env = EnvironmentConfig::default();
    let few = autotune(&env, &config(10), &mut StdRng::seed_from_u64(5)).unwrap();
    let many = autotune(&env, &config(40), &mut StdRng::seed_from_u64(5)).unwrap();
    assert!(many.score <= few.score);
}

#[test]
fn narrow_bounds_pin_the_result() {
    let cfg = TuneConfig {
        bounds: SearchBounds {
            kp: GainRange::new(6.0, 6.0),
            ki: GainRange::new(0.5, 0.5),
            kd: GainRange::new(3.0, 3.0),
        },
        ..config(4)
    };
    let best = autotune(&EnvironmentConfig::default(), &cfg, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(best.gains.kp, 6.0);
    assert_eq!(best.gains.ki, 0.5);
    assert_eq!(best.gains.kd, 3.0);
}

#[test]
fn custom_weights_are_used() {
    let env = EnvironmentConfig::default();
    let weights = ScoreWeights { rise_time: 1.0, overshoot: 0.0, settling_time: 0.0 };
    let cfg = TuneConfig { weights, ..config(5) };
    let best = autotune(&env, &cfg, &mut StdRng::seed_from_u64(6)).unwrap();
    let run = run_simulation_with(&best.gains, &cfg.search_environment(&env), &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(best.score, run.metrics.rise_time);
}

#[test]
fn job_reports_in_progress_then_complete() {
    let job = AutotuneJob::spawn(EnvironmentConfig::default(), config(8), Some(77)).unwrap();
    let statuses: Vec<TuneStatus> = job.status().iter().collect();
    let outcome = job.join().unwrap();

    assert!(statuses.iter().any(|s| matches!(s, TuneStatus::InProgress { .. })));
    match (statuses.last(), outcome) {
        (Some(TuneStatus::Complete { final_score, best }), TuneOutcome::Complete(result)) => {
            assert_eq!(*final_score, result.score);
            assert_eq!(*best, result);
        }
        other => panic!("unexpected ending: {:?}", other),
    }
}
