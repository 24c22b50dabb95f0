use serde::{Deserialize, Serialize};

use crate::error::{Result, TuneError};

// ---------------------------------------------------------------------------
// PID gains and control law (single axis)
// ---------------------------------------------------------------------------

/// Proportional, integral and derivative gains.
///
/// Non-negative by convention only; nothing here relies on the sign. Gains
/// must be finite. Large finite gains can still drive the loop unstable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GainSet {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// Result of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    pub control: f64,               // thrust command, N
    pub integral: f64,              // updated running integral
    pub error: f64,                 // becomes next step's previous error
}

impl GainSet {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !value.is_finite() {
                return Err(TuneError::invalid(field, value, "gain must be finite"));
            }
        }
        Ok(())
    }

    /// Evaluate the control law for one step.
    ///
    /// The integral is advanced by `error * dt` before it is used, and the
    /// derivative is a backward difference against `prev_error`. There is no
    /// anti-windup. `baseline` is the feed-forward hover force. `dt` must be
    /// positive; the runner validates it before the loop starts.
    pub fn update(&self, error: f64, integral: f64, prev_error: f64, dt: f64, baseline: f64) -> PidOutput {
        let integral = integral + error * dt;
        let derivative = (error - prev_error) / dt;
        let control = baseline + self.kp * error + self.ki * integral + self.kd * derivative;
        PidOutput { control, integral, error }
    }
}
