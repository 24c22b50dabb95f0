use serde::{Deserialize, Serialize};

use super::runner::SampleRecord;

/// Fraction of the setpoint that counts as "risen".
pub const RISE_FRACTION: f64 = 0.9;
/// Relative error band for settling (2% criterion).
pub const SETTLING_BAND: f64 = 0.02;

// ---------------------------------------------------------------------------
// Step-response metrics
// ---------------------------------------------------------------------------

/// Step-response summary of one run.
///
/// `rise_time` and `settling_time` equal the run horizon when the event never
/// happens. `overshoot_percent` is the peak signed excursion above the
/// setpoint and is negative when the response never reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub rise_time: f64,
    pub overshoot_percent: f64,
    pub settling_time: f64,
}

/// Derive metrics from a record sequence.
///
/// Settling time is the time of the most recent entry into the 2% band: each
/// excursion outside the band discards the previous entry time, and a run that
/// ends outside the band reports `horizon`. An empty slice reports both
/// sentinels and zero overshoot.
pub fn extract_metrics(records: &[SampleRecord], setpoint: f64, horizon: f64) -> Metrics {
    let mut rise_time = None;
    let mut settled_since = None;
    let mut overshoot = f64::NEG_INFINITY;

    for r in records {
        if rise_time.is_none() && r.position >= RISE_FRACTION * setpoint {
            rise_time = Some(r.time);
        }

        overshoot = overshoot.max((r.position - setpoint) / setpoint * 100.0);

        if (r.position - setpoint).abs() / setpoint <= SETTLING_BAND {
            settled_since.get_or_insert(r.time);
        } else {
            settled_since = None;
        }
    }

    if records.is_empty() {
        overshoot = 0.0;
    }

    Metrics {
        rise_time: rise_time.unwrap_or(horizon),
        overshoot_percent: overshoot,
        settling_time: settled_since.unwrap_or(horizon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(points: &[(f64, f64)]) -> Vec<SampleRecord> {
        points
            .iter()
            .map(|&(time, position)| SampleRecord {
                time,
                position,
                setpoint: 10.0,
                control: 0.0,
                error: 10.0 - position,
            })
            .collect()
    }

    #[test]
    fn rise_time_first_crossing() {
        let recs = series(&[(0.0, 0.0), (1.0, 8.9), (2.0, 9.0), (3.0, 9.5)]);
        let m = extract_metrics(&recs, 10.0, 5.0);
        assert_eq!(m.rise_time, 2.0);
    }

    #[test]
    fn unreached_uses_horizon() {
        let recs = series(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let m = extract_metrics(&recs, 10.0, 3.0);
        assert_eq!(m.rise_time, 3.0);
        assert_eq!(m.settling_time, 3.0);
    }

    #[test]
    fn overshoot_peak_percent() {
        let recs = series(&[(0.0, 5.0), (1.0, 12.5), (2.0, 10.5)]);
        let m = extract_metrics(&recs, 10.0, 3.0);
        assert_relative_eq!(m.overshoot_percent, 25.0, epsilon = 1e-12);
    }

    #[test]
    fn undershoot_is_negative() {
        let recs = series(&[(0.0, 0.0), (1.0, 5.0)]);
        let m = extract_metrics(&recs, 10.0, 2.0);
        assert_relative_eq!(m.overshoot_percent, -50.0, epsilon = 1e-12);
    }

    #[test]
    fn settling_rearms_on_exit() {
        // enter at 1, leave at 2, re-enter at 3
        let recs = series(&[(0.0, 0.0), (1.0, 9.9), (2.0, 10.5), (3.0, 10.1), (4.0, 10.0)]);
        let m = extract_metrics(&recs, 10.0, 5.0);
        assert_eq!(m.settling_time, 3.0);
    }

    #[test]
    fn band_edge_counts_as_settled() {
        let recs = series(&[(0.0, 0.0), (1.0, 9.8), (2.0, 10.2)]);
        let m = extract_metrics(&recs, 10.0, 3.0);
        assert_eq!(m.settling_time, 1.0);
    }

    #[test]
    fn ending_outside_band_reports_horizon() {
        let recs = series(&[(0.0, 10.0), (1.0, 10.0), (2.0, 11.0)]);
        let m = extract_metrics(&recs, 10.0, 3.0);
        assert_eq!(m.settling_time, 3.0);
    }

    #[test]
    fn empty_series() {
        let m = extract_metrics(&[], 10.0, 4.0);
        assert_eq!(m, Metrics { rise_time: 4.0, overshoot_percent: 0.0, settling_time: 4.0 });
    }
}
