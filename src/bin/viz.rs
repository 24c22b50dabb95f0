use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use hover_tune::types::{EnvironmentConfig, GainSet, SimulationRun, TuneConfig};
use hover_tune::{apply_gains, run_simulation, AutotuneJob, TuneStatus};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = TunerViz::new();
    app.rerun();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Hover PID Tuner", options, Box::new(|_| Ok(Box::new(app))))
}

struct TunerViz {
    gains: GainSet,
    env: EnvironmentConfig,
    run: Option<SimulationRun>,
    message: String,
    job: Option<AutotuneJob>,
}

impl TunerViz {
    fn new() -> Self {
        Self {
            gains: GainSet::new(5.0, 1.0, 2.0),
            env: EnvironmentConfig::default(),
            run: None,
            message: String::new(),
            job: None,
        }
    }

    /// Re-run explicitly; the engine never re-runs on its own.
    fn rerun(&mut self) {
        match run_simulation(&self.gains, &self.env) {
            Ok(run) => self.run = Some(run),
            Err(e) => {
                self.run = None;
                self.message = e.to_string();
            }
        }
    }

    fn start_autotune(&mut self) {
        match AutotuneJob::spawn(self.env, TuneConfig::default(), None) {
            Ok(job) => {
                self.message = "Autotuning...".into();
                self.job = Some(job);
            }
            Err(e) => self.message = e.to_string(),
        }
    }

    fn poll_autotune(&mut self) {
        let Some(job) = &self.job else { return };
        let updates: Vec<TuneStatus> = job.status().try_iter().collect();

        let mut done = false;
        for status in updates {
            match status {
                TuneStatus::InProgress { completed, total, best_score } => {
                    self.message = format!(
                        "Autotuning... {}/{} (best {:.3})",
                        completed,
                        total,
                        best_score.unwrap_or(f64::NAN)
                    );
                }
                TuneStatus::Complete { best, final_score } => {
                    self.gains = apply_gains(&best);
                    self.message = format!("Autotune complete, score {:.3}", final_score);
                    done = true;
                }
                TuneStatus::Cancelled { completed, .. } => {
                    self.message = format!("Autotune cancelled after {} samples", completed);
                    done = true;
                }
                TuneStatus::Failed { reason } => {
                    self.message = format!("Autotune failed: {}", reason);
                    done = true;
                }
                TuneStatus::Started { .. } => {}
            }
        }

        if done {
            if let Some(job) = self.job.take() {
                if let Err(e) = job.join() {
                    self.message = e.to_string();
                }
            }
            self.rerun();
        }
    }
}

impl eframe::App for TunerViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_autotune();
        if self.job.is_some() {
            ctx.request_repaint();
        }

        egui::SidePanel::left("controls").min_width(260.0).show(ctx, |ui| {
            let mut changed = false;
            let busy = self.job.is_some();

            ui.heading("Gains");
            ui.add_enabled_ui(!busy, |ui| {
                changed |= ui.add(egui::Slider::new(&mut self.gains.kp, 0.0..=20.0).text("Kp")).changed();
                changed |= ui.add(egui::Slider::new(&mut self.gains.ki, 0.0..=5.0).text("Ki")).changed();
                changed |= ui.add(egui::Slider::new(&mut self.gains.kd, 0.0..=10.0).text("Kd")).changed();
            });

            ui.separator();
            ui.heading("Environment");
            changed |= ui.add(egui::Slider::new(&mut self.env.setpoint, 1.0..=50.0).text("Setpoint (m)")).changed();
            changed |= ui.add(egui::Slider::new(&mut self.env.mass, 0.1..=10.0).text("Mass (kg)")).changed();
            changed |= ui.add(egui::Slider::new(&mut self.env.gravity, 0.0..=20.0).text("Gravity (m/s²)")).changed();
            changed |= ui.add(egui::Slider::new(&mut self.env.disturbance, 0.0..=5.0).text("Wind (m/s²)")).changed();
            changed |= ui.add(egui::Slider::new(&mut self.env.horizon, 1.0..=30.0).text("Horizon (s)")).changed();

            ui.separator();
            if busy {
                if ui.button("Cancel autotune").clicked() {
                    if let Some(job) = &self.job {
                        job.cancel();
                    }
                }
            } else if ui.button("Autotune").clicked() {
                self.start_autotune();
            }
            if ui.button("Re-run").clicked() {
                changed = true;
            }

            ui.separator();
            if let Some(run) = &self.run {
                let m = &run.metrics;
                ui.label(format!("Rise time:  {:.2} s", m.rise_time));
                ui.label(format!("Overshoot:  {:.2} %", m.overshoot_percent));
                ui.label(format!("Settling:   {:.2} s", m.settling_time));
                ui.label(format!("Score:      {:.3}", run.score()));
            }
            if !self.message.is_empty() {
                ui.label(self.message.as_str());
            }

            if changed {
                self.rerun();
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(run) = &self.run else {
                ui.label("No simulation data");
                return;
            };
            let half_h = ui.available_size().y / 2.0 - 16.0;

            ui.label("Altitude (m)");
            let position: PlotPoints = run.records.iter().map(|r| [r.time, r.position]).collect();
            let setpoint: PlotPoints = run.records.iter().map(|r| [r.time, r.setpoint]).collect();
            Plot::new("altitude")
                .height(half_h)
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Position", position));
                    plot_ui.line(Line::new("Setpoint", setpoint));
                });

            ui.label("Thrust command (N)");
            let control: PlotPoints = run.records.iter().map(|r| [r.time, r.control]).collect();
            Plot::new("control")
                .height(half_h)
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Control", control));
                });
        });
    }
}
