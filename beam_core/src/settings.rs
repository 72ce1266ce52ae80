//! # Analysis Settings
//!
//! Numeric controls for a sweep. Settings serialize as part of a beam model
//! file; missing fields take their defaults.
//!
//! ```rust
//! use beam_core::settings::AnalysisSettings;
//!
//! let settings: AnalysisSettings = serde_json::from_str(r#"{ "step": 0.01 }"#).unwrap();
//! assert_eq!(settings.step, 0.01);
//! assert_eq!(settings.quadrature_substeps, 10);
//! assert_eq!(settings.sample_count(10.0), 1001);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};

/// Slack for rounding when converting positions to step indices
pub(crate) const INDEX_TOLERANCE: f64 = 1e-9;

/// Reactions smaller than this, relative to the net load, are zero
pub(crate) const REACTION_TOLERANCE: f64 = 1e-9;

/// Controls for the diagram sweep and custom-load quadrature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Distance between diagram samples (m)
    pub step: f64,

    /// Riemann samples per step when integrating custom loads
    pub quadrature_substeps: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            step: 0.001,
            quadrature_substeps: 10,
        }
    }
}

impl AnalysisSettings {
    /// Settings with a given sweep step (builder pattern)
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn validate(&self) -> BeamResult<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(BeamError::invalid_input(
                "step",
                self.step.to_string(),
                "Sweep step must be a positive number",
            ));
        }
        if self.quadrature_substeps == 0 {
            return Err(BeamError::invalid_input(
                "quadrature_substeps",
                "0",
                "At least one quadrature sample per step is required",
            ));
        }
        Ok(())
    }

    /// Index of the last sample of a sweep over `length`: `floor(length / step)`
    pub fn last_index(&self, length: f64) -> usize {
        (length / self.step + INDEX_TOLERANCE).floor().max(0.0) as usize
    }

    /// Number of diagram samples for a beam of `length`
    pub fn sample_count(&self, length: f64) -> usize {
        self.last_index(length) + 1
    }

    /// True when `step` divides `length` into whole steps
    pub fn divides(&self, length: f64) -> bool {
        let steps = length / self.step;
        (steps - steps.round()).abs() < 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.step, 0.001);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sample_count(10.0), 10_001);
    }

    #[test]
    fn test_rejects_bad_step() {
        assert!(AnalysisSettings::default().with_step(0.0).validate().is_err());
        assert!(AnalysisSettings::default().with_step(f64::NAN).validate().is_err());
        let settings = AnalysisSettings {
            quadrature_substeps: 0,
            ..AnalysisSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_sample_count_uneven_step() {
        let settings = AnalysisSettings::default().with_step(0.3);
        assert_eq!(settings.sample_count(1.0), 4);
        assert!(!settings.divides(1.0));
        assert!(AnalysisSettings::default().with_step(0.25).divides(1.0));
    }
}
