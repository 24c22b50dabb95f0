use hover_tune::io::csv;
use hover_tune::io::json::{self, RunSummary};
use hover_tune::types::{EnvironmentConfig, GainSet, SampleRecord, TuneConfig};
use hover_tune::{apply_gains, run_simulation, AutotuneJob, TuneOutcome, TuneStatus};

fn main() -> hover_tune::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // -----------------------------------------------------------------------
    // Usage: hover-tune [env.json | -] [output prefix]
    // -----------------------------------------------------------------------
    let args: Vec<String> = std::env::args().skip(1).collect();
    let env = match args.first().map(String::as_str) {
        Some("-") | None => EnvironmentConfig::default(),
        Some(path) => EnvironmentConfig::from_json_file(path)?,
    };
    let output_prefix = args.get(1);

    // -----------------------------------------------------------------------
    // Reference step response
    // -----------------------------------------------------------------------
    let gains = GainSet::new(5.0, 1.0, 2.0);
    let run = run_simulation(&gains, &env)?;

    println!();
    println!("====================================================================");
    println!("  HOVER PID STEP RESPONSE");
    println!("====================================================================");
    println!();
    print_environment(&env);
    print_run("Manual gains", &gains, &run.metrics, run.score());
    print_trajectory(&run.records);

    // -----------------------------------------------------------------------
    // Random-search autotune
    // -----------------------------------------------------------------------
    let config = TuneConfig::default();
    println!("  Autotune ({} samples, seed 42)", config.samples);
    println!("  ──────────────────────────────────────────────────────────────────");

    let job = AutotuneJob::spawn(env, config, Some(42))?;
    for status in job.status().iter() {
        match status {
            TuneStatus::InProgress { completed, total, best_score } if completed % 10 == 0 => {
                println!(
                    "  {:>4}/{:<4}  best {:>10.4}",
                    completed,
                    total,
                    best_score.unwrap_or(f64::NAN)
                );
            }
            TuneStatus::Complete { final_score, .. } => {
                println!("  complete, final score {:.4}", final_score);
            }
            TuneStatus::Cancelled { completed, .. } => println!("  cancelled after {}", completed),
            TuneStatus::Failed { reason } => println!("  failed: {}", reason),
            _ => {}
        }
    }
    println!();

    if let TuneOutcome::Complete(best) = job.join()? {
        let tuned = apply_gains(&best);
        let rerun = run_simulation(&tuned, &env)?;
        print_run("Tuned gains", &tuned, &rerun.metrics, rerun.score());

        json::write_tuning(&mut std::io::stdout().lock(), &best)?;
        println!();

        if let Some(prefix) = output_prefix {
            let csv_path = format!("{}.csv", prefix);
            let json_path = format!("{}.json", prefix);
            csv::write_records_file(&csv_path, &rerun.records)?;
            json::write_summary_file(&json_path, &RunSummary::from_run(&tuned, &env, &rerun))?;
            println!("  Exported: {}, {}", csv_path, json_path);
            println!();
        }
    }

    println!("====================================================================");
    println!();
    Ok(())
}

fn print_environment(env: &EnvironmentConfig) {
    println!("  Environment");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Setpoint:  {:>8.2} m      Mass:      {:>8.2} kg",
        env.setpoint, env.mass
    );
    println!(
        "  Gravity:   {:>8.2} m/s^2  Wind:      {:>8.2} m/s^2",
        env.gravity, env.disturbance
    );
    println!(
        "  dt:        {:>8.3} s      Horizon:   {:>8.1} s   ({} steps)",
        env.dt,
        env.horizon,
        env.step_count()
    );
    println!();
}

fn print_run(label: &str, gains: &GainSet, m: &hover_tune::types::Metrics, score: f64) {
    println!("  {}", label);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Kp {:>7.3}   Ki {:>7.3}   Kd {:>7.3}",
        gains.kp, gains.ki, gains.kd
    );
    println!(
        "  Rise {:>7.2} s   Overshoot {:>7.2} %   Settling {:>7.2} s   Score {:>8.3}",
        m.rise_time, m.overshoot_percent, m.settling_time, score
    );
    println!();
}

fn print_trajectory(records: &[SampleRecord]) {
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>10}",
        "t (s)", "alt (m)", "err (m)", "thrust (N)"
    );
    println!("  {}", "─".repeat(42));

    let sample_interval = (records.len() / 20).max(1);
    for (i, r) in records.iter().enumerate() {
        if i % sample_interval != 0 && i != records.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.3}  {:>9.3}  {:>10.3}",
            r.time, r.position, r.error, r.control
        );
    }
    println!();
}
