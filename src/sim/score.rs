use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

/// Linear weights that collapse [`Metrics`] into one cost. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub rise_time: f64,
    pub overshoot: f64,
    pub settling_time: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { rise_time: 1.0, overshoot: 0.5, settling_time: 1.5 }
    }
}

impl ScoreWeights {
    /// Total over all inputs; negative overshoot lowers the score.
    pub fn score(&self, m: &Metrics) -> f64 {
        self.rise_time * m.rise_time
            + self.overshoot * m.overshoot_percent
            + self.settling_time * m.settling_time
    }
}

/// Score with the default weights.
pub fn compute_score(m: &Metrics) -> f64 {
    ScoreWeights::default().score(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights() {
        let m = Metrics { rise_time: 2.0, overshoot_percent: 10.0, settling_time: 4.0 };
        assert!((compute_score(&m) - (2.0 + 5.0 + 6.0)).abs() < 1e-12);
    }

    #[test]
    fn undershoot_lowers_score() {
        let m = Metrics { rise_time: 1.0, overshoot_percent: -20.0, settling_time: 0.0 };
        assert!((compute_score(&m) - (-9.0)).abs() < 1e-12);
    }

    #[test]
    fn custom_weights() {
        let w = ScoreWeights { rise_time: 0.0, overshoot: 1.0, settling_time: 0.0 };
        let m = Metrics { rise_time: 9.0, overshoot_percent: 3.5, settling_time: 9.0 };
        assert_eq!(w.score(&m), 3.5);
    }
}
