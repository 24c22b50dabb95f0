use thiserror::Error;

/// Errors surfaced by the simulation and tuning engine.
#[derive(Error, Debug)]
pub enum TuneError {
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("autotune worker thread panicked")]
    WorkerPanicked,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TuneError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        TuneError::InvalidConfig { field, value, reason }
    }
}

pub type Result<T> = std::result::Result<T, TuneError>;

/// Reject NaN and values `<= 0`.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(TuneError::invalid(field, value, "must be positive"));
    }
    if !value.is_finite() {
        return Err(TuneError::invalid(field, value, "must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check() {
        assert!(require_positive("dt", 0.01).is_ok());
        assert!(require_positive("dt", 0.0).is_err());
        assert!(require_positive("dt", -1.0).is_err());
        assert!(require_positive("dt", f64::NAN).is_err());
        assert!(require_positive("dt", f64::INFINITY).is_err());
    }

    #[test]
    fn message_names_field() {
        let err = require_positive("mass", 0.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }
}
