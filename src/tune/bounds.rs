use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TuneError};
use crate::gnc::GainSet;

/// Closed interval `[min, max]` a single gain is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainRange {
    pub min: f64,
    pub max: f64,
}

impl GainRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if !self.min.is_finite() {
            return Err(TuneError::invalid(field, self.min, "lower bound must be finite"));
        }
        if !self.max.is_finite() {
            return Err(TuneError::invalid(field, self.max, "upper bound must be finite"));
        }
        if self.min > self.max {
            return Err(TuneError::invalid(field, self.min, "lower bound exceeds upper bound"));
        }
        Ok(())
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Box in gain space searched by the autotuner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBounds {
    pub kp: GainRange,
    pub ki: GainRange,
    pub kd: GainRange,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            kp: GainRange::new(1.0, 20.0),
            ki: GainRange::new(0.0, 5.0),
            kd: GainRange::new(0.0, 10.0),
        }
    }
}

impl SearchBounds {
    pub fn validate(&self) -> Result<()> {
        self.kp.validate("kp bounds")?;
        self.ki.validate("ki bounds")?;
        self.kd.validate("kd bounds")
    }

    pub fn contains(&self, g: &GainSet) -> bool {
        self.kp.contains(g.kp) && self.ki.contains(g.ki) && self.kd.contains(g.kd)
    }

    /// Uniform draw, one gain at a time in kp, ki, kd order.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GainSet {
        let kp = self.kp.sample(rng);
        let ki = self.ki.sample(rng);
        let kd = self.kd.sample(rng);
        GainSet { kp, ki, kd }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_inside() {
        let b = SearchBounds::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            assert!(b.contains(&b.sample(&mut rng)));
        }
    }

    #[test]
    fn degenerate_range_is_allowed() {
        let b = SearchBounds { ki: GainRange::new(2.0, 2.0), ..Default::default() };
        assert!(b.validate().is_ok());
        assert_eq!(b.sample(&mut StdRng::seed_from_u64(0)).ki, 2.0);
    }

    #[test]
    fn inverted_range_rejected() {
        let b = SearchBounds { kd: GainRange::new(5.0, 1.0), ..Default::default() };
        assert!(matches!(b.validate(), Err(TuneError::InvalidConfig { field: "kd bounds", .. })));
    }

    #[test]
    fn nan_range_rejected() {
        let b = SearchBounds { kp: GainRange::new(f64::NAN, 1.0), ..Default::default() };
        assert!(b.validate().is_err());
    }
}
