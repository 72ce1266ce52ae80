//! Loads applied to a beam
//!
//! - [`Load`] - Closed set of load kinds (point, uniform, linear, parabolic, moment, custom)
//! - [`LoadKind`] - Kind tag, parseable from strings such as `"uniform"`
//! - [`PreparedLoad`] - A load paired with whatever it needs to be evaluated in a sweep
//!
//! All magnitudes are positive downward (forces) or clockwise (moments).
//!
//! # Example
//!
//! ```
//! use beam_core::loads::Load;
//!
//! let load = Load::uniform(0.0, 4.0, 2.0);
//! let effect = load.effect_at(4.0).unwrap();
//! assert_eq!(effect.force, 8.0);
//! assert_eq!(effect.moment, 16.0);
//! assert_eq!(load.describe(), "Uniform Load: 2 kN/m from 0 m to 4 m");
//! ```

pub mod custom;
pub mod distributed;

pub use custom::{CustomLoad, EffectTable, Expression};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::effect::LoadEffect;
use crate::errors::{BeamError, BeamResult};
use crate::settings::AnalysisSettings;
use distributed::{linear_effect, parabolic_effect, uniform_effect};

/// Kind tag of a [`Load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadKind {
    Point,
    Uniform,
    Linear,
    Parabolic,
    Moment,
    Custom,
}

impl LoadKind {
    pub const ALL: [LoadKind; 6] = [
        LoadKind::Point,
        LoadKind::Uniform,
        LoadKind::Linear,
        LoadKind::Parabolic,
        LoadKind::Moment,
        LoadKind::Custom,
    ];

    /// Tag used in JSON and on the command line
    pub fn tag(&self) -> &'static str {
        match self {
            LoadKind::Point => "point",
            LoadKind::Uniform => "uniform",
            LoadKind::Linear => "linear",
            LoadKind::Parabolic => "parabolic",
            LoadKind::Moment => "moment",
            LoadKind::Custom => "custom",
        }
    }

    /// Concentrated loads act at a single position
    pub fn is_concentrated(&self) -> bool {
        matches!(self, LoadKind::Point | LoadKind::Moment)
    }
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LoadKind {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        LoadKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| BeamError::invalid_argument("type", s, "Invalid load type"))
    }
}

/// A load applied to the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Load {
    /// Concentrated force (kN) at `pos` (m)
    Point { pos: f64, mag: f64 },

    /// Constant intensity (kN/m) over `[start, end]`
    Uniform { start: f64, end: f64, mag: f64 },

    /// Intensity varying linearly from `start_mag` to `end_mag` (kN/m)
    Linear {
        start: f64,
        end: f64,
        start_mag: f64,
        end_mag: f64,
    },

    /// Intensity varying quadratically from `start_mag` to `end_mag` (kN/m)
    Parabolic {
        start: f64,
        end: f64,
        start_mag: f64,
        end_mag: f64,
    },

    /// Applied couple (kN·m) at `pos` (m), positive clockwise
    Moment { pos: f64, mag: f64 },

    /// Intensity given by a formula in `x`
    Custom(CustomLoad),
}

impl Load {
    pub fn point(pos: f64, mag: f64) -> Self {
        Load::Point { pos, mag }
    }

    pub fn uniform(start: f64, end: f64, mag: f64) -> Self {
        Load::Uniform { start, end, mag }
    }

    pub fn linear(start: f64, end: f64, start_mag: f64, end_mag: f64) -> Self {
        Load::Linear {
            start,
            end,
            start_mag,
            end_mag,
        }
    }

    pub fn parabolic(start: f64, end: f64, start_mag: f64, end_mag: f64) -> Self {
        Load::Parabolic {
            start,
            end,
            start_mag,
            end_mag,
        }
    }

    pub fn moment(pos: f64, mag: f64) -> Self {
        Load::Moment { pos, mag }
    }

    /// Create a custom load, checking that the formula evaluates at `start`
    pub fn custom(start: f64, end: f64, expression: &str) -> BeamResult<Self> {
        let expression = Expression::parse(expression)?;
        expression.intensity_at(start)?;
        Ok(Load::Custom(CustomLoad {
            start,
            end,
            expression,
        }))
    }

    pub fn kind(&self) -> LoadKind {
        match self {
            Load::Point { .. } => LoadKind::Point,
            Load::Uniform { .. } => LoadKind::Uniform,
            Load::Linear { .. } => LoadKind::Linear,
            Load::Parabolic { .. } => LoadKind::Parabolic,
            Load::Moment { .. } => LoadKind::Moment,
            Load::Custom(_) => LoadKind::Custom,
        }
    }

    /// Positions covered by the load; `(pos, pos)` for concentrated loads
    pub fn extent(&self) -> (f64, f64) {
        match self {
            Load::Point { pos, .. } | Load::Moment { pos, .. } => (*pos, *pos),
            Load::Uniform { start, end, .. }
            | Load::Linear { start, end, .. }
            | Load::Parabolic { start, end, .. } => (*start, *end),
            Load::Custom(c) => (c.start, c.end),
        }
    }

    /// Peak absolute intensity, for scaling rendered load arrows
    pub fn max_magnitude(&self) -> f64 {
        match self {
            Load::Point { mag, .. } | Load::Uniform { mag, .. } | Load::Moment { mag, .. } => mag.abs(),
            Load::Linear {
                start_mag, end_mag, ..
            }
            | Load::Parabolic {
                start_mag, end_mag, ..
            } => start_mag.abs().max(end_mag.abs()),
            Load::Custom(c) => c.max_magnitude(),
        }
    }

    /// Check that the load lies on a beam of `length`
    pub fn check_bounds(&self, length: f64) -> BeamResult<()> {
        let on_beam = |p: f64| (0.0..=length).contains(&p);
        let (start, end) = self.extent();

        if self.kind().is_concentrated() {
            if !on_beam(start) {
                return Err(BeamError::out_of_bounds(
                    self.describe(),
                    length,
                    format!("Load at position {} m is out of beam bounds", start),
                ));
            }
        } else if !(on_beam(start) && on_beam(end) && start < end) {
            return Err(BeamError::out_of_bounds(
                self.describe(),
                length,
                format!("Load from {} m to {} m is out of beam bounds or invalid", start, end),
            ));
        }
        Ok(())
    }

    /// Effect at cut `x` for loads with a closed form.
    ///
    /// Custom loads need an [`EffectTable`]; use [`Load::effect_with`] or a
    /// [`PreparedLoad`].
    pub fn effect_at(&self, x: f64) -> BeamResult<LoadEffect> {
        match self {
            Load::Custom(_) => Err(BeamError::MissingEffectTable {
                load: self.describe(),
            }),
            _ => Ok(self.closed_form_effect(x)),
        }
    }

    /// Effect at cut `x` in a sweep of `length` at `step`, reading custom
    /// loads from `table`.
    ///
    /// The table must have been built from this load for the same sweep.
    pub fn effect_with(
        &self,
        x: f64,
        table: Option<&EffectTable>,
        length: f64,
        step: f64,
    ) -> BeamResult<LoadEffect> {
        match (self, table) {
            (Load::Custom(custom), Some(table)) => {
                table.check(custom, length, step)?;
                Ok(table.effect_at(x))
            }
            _ => self.effect_at(x),
        }
    }

    fn closed_form_effect(&self, x: f64) -> LoadEffect {
        match *self {
            Load::Point { pos, mag } => {
                if x >= pos {
                    LoadEffect::resultant(mag, pos, x)
                } else {
                    LoadEffect::ZERO
                }
            }
            Load::Uniform { start, end, mag } => uniform_effect(start, end, mag, x),
            Load::Linear {
                start,
                end,
                start_mag,
                end_mag,
            } => linear_effect(start, end, start_mag, end_mag, x),
            Load::Parabolic {
                start,
                end,
                start_mag,
                end_mag,
            } => parabolic_effect(start, end, start_mag, end_mag, x),
            Load::Moment { pos, mag } => {
                if x >= pos {
                    LoadEffect::new(0.0, mag)
                } else {
                    LoadEffect::ZERO
                }
            }
            Load::Custom(_) => LoadEffect::ZERO,
        }
    }

    /// Human-readable summary
    pub fn describe(&self) -> String {
        match self {
            Load::Point { pos, mag } => format!("Point Load: {} kN at {} m", mag, pos),
            Load::Uniform { start, end, mag } => {
                format!("Uniform Load: {} kN/m from {} m to {} m", mag, start, end)
            }
            Load::Linear {
                start,
                end,
                start_mag,
                end_mag,
            } => format!(
                "Linear Load: from {} kN/m at {} m to {} kN/m at {} m",
                start_mag, start, end_mag, end
            ),
            Load::Parabolic {
                start,
                end,
                start_mag,
                end_mag,
            } => format!(
                "Parabolic Load: from {} kN/m at {} m to {} kN/m at {} m",
                start_mag, start, end_mag, end
            ),
            Load::Moment { pos, mag } => format!("Moment Load: {} kN·m at {} m", mag, pos),
            Load::Custom(c) => c.describe(),
        }
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A load ready to be evaluated anywhere along one sweep.
///
/// Closed-form loads carry nothing extra; custom loads carry the
/// [`EffectTable`] built for the sweep's `(length, step)`.
#[derive(Debug, Clone)]
pub struct PreparedLoad<'a> {
    load: &'a Load,
    table: Option<EffectTable>,
}

impl<'a> PreparedLoad<'a> {
    /// Build whatever `load` needs for a sweep of `length` at `settings.step`
    pub fn new(load: &'a Load, length: f64, settings: &AnalysisSettings) -> BeamResult<Self> {
        let table = match load {
            Load::Custom(custom) => Some(EffectTable::build(custom, length, settings)?),
            _ => None,
        };
        Ok(PreparedLoad { load, table })
    }

    pub fn load(&self) -> &'a Load {
        self.load
    }

    pub fn table(&self) -> Option<&EffectTable> {
        self.table.as_ref()
    }

    pub fn effect_at(&self, x: f64) -> LoadEffect {
        match &self.table {
            Some(table) => table.effect_at(x),
            None => self.load.closed_form_effect(x),
        }
    }
}

/// Prepare every load for one sweep, building custom tables
pub fn prepare_loads<'a>(
    loads: &'a [Load],
    length: f64,
    settings: &AnalysisSettings,
) -> BeamResult<Vec<PreparedLoad<'a>>> {
    loads
        .iter()
        .map(|load| PreparedLoad::new(load, length, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all_kinds() -> Vec<Load> {
        vec![
            Load::point(3.0, 10.0),
            Load::uniform(3.0, 6.0, 2.0),
            Load::linear(3.0, 6.0, 1.0, 4.0),
            Load::parabolic(3.0, 6.0, 4.0, 1.0),
            Load::moment(3.0, 5.0),
            Load::custom(3.0, 6.0, "1 + x").unwrap(),
        ]
    }

    #[test]
    fn test_zero_before_start_for_every_kind() {
        let settings = AnalysisSettings::default().with_step(0.01);
        for load in all_kinds() {
            let prepared = PreparedLoad::new(&load, 10.0, &settings).unwrap();
            for &x in &[0.0, 1.5, 2.999] {
                assert_eq!(prepared.effect_at(x), LoadEffect::ZERO, "{} at {}", load, x);
            }
        }
    }

    #[test]
    fn test_point_and_moment() {
        let point = Load::point(2.0, 10.0);
        assert_eq!(point.effect_at(5.0).unwrap(), LoadEffect::new(10.0, 30.0));
        assert_eq!(point.effect_at(2.0).unwrap(), LoadEffect::new(10.0, 0.0));

        let couple = Load::moment(2.0, 7.0);
        assert_eq!(couple.effect_at(2.0).unwrap(), LoadEffect::new(0.0, 7.0));
        assert_eq!(couple.effect_at(9.0).unwrap(), LoadEffect::new(0.0, 7.0));
    }

    #[test]
    fn test_uniform_equals_degenerate_parabolic() {
        let uniform = Load::uniform(1.0, 9.0, 3.0);
        let parabolic = Load::parabolic(1.0, 9.0, 3.0, 3.0);
        for i in 0..=100 {
            let x = i as f64 * 0.1;
            assert_eq!(uniform.effect_at(x).unwrap(), parabolic.effect_at(x).unwrap());
        }
    }

    #[test]
    fn test_custom_needs_table() {
        let load = Load::custom(0.0, 2.0, "2.0").unwrap();
        assert!(matches!(
            load.effect_at(1.0),
            Err(BeamError::MissingEffectTable { .. })
        ));

        let settings = AnalysisSettings::default().with_step(0.01);
        let prepared = PreparedLoad::new(&load, 2.0, &settings).unwrap();
        let table = prepared.table().unwrap();
        let e = load.effect_with(2.0, Some(table), 2.0, 0.01).unwrap();
        assert_relative_eq!(e.force, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_rejects_table_from_another_sweep() {
        let short = Load::custom(0.0, 2.0, "1.0").unwrap();
        let long = Load::custom(0.0, 10.0, "1.0").unwrap();
        let settings = AnalysisSettings::default().with_step(0.5);
        let prepared = PreparedLoad::new(&short, 2.0, &settings).unwrap();
        let table = prepared.table().unwrap();

        // Same formula, different span
        assert!(matches!(
            long.effect_with(10.0, Some(table), 10.0, 0.5),
            Err(BeamError::MissingEffectTable { .. })
        ));
        // Right load, wrong beam
        assert!(matches!(
            short.effect_with(2.0, Some(table), 10.0, 0.5),
            Err(BeamError::StaleEffectTable { .. })
        ));
        assert!(matches!(
            short.effect_with(2.0, Some(table), 2.0, 0.25),
            Err(BeamError::StaleEffectTable { .. })
        ));
        let e = short.effect_with(2.0, Some(table), 2.0, 0.5).unwrap();
        assert_relative_eq!(e.force, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_rejects_bad_formula() {
        assert!(Load::custom(0.0, 1.0, "z * 2").is_err());
        assert!(Load::custom(0.0, 1.0, "x +").is_err());
    }

    #[test]
    fn test_bounds() {
        assert!(Load::point(11.0, 10.0).check_bounds(10.0).is_err());
        assert!(Load::point(10.0, 10.0).check_bounds(10.0).is_ok());
        assert!(Load::uniform(4.0, 4.0, 1.0).check_bounds(10.0).is_err());
        assert!(Load::linear(-1.0, 4.0, 1.0, 2.0).check_bounds(10.0).is_err());
        assert!(Load::custom(2.0, 12.0, "1").unwrap().check_bounds(10.0).is_err());
        assert!(Load::moment(f64::NAN, 1.0).check_bounds(10.0).is_err());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Parabolic".parse::<LoadKind>().unwrap(), LoadKind::Parabolic);
        let err = "triangular".parse::<LoadKind>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONSTRUCTOR_ARGUMENT");
    }

    #[test]
    fn test_describe() {
        assert_eq!(Load::point(5.0, 10.0).describe(), "Point Load: 10 kN at 5 m");
        assert_eq!(
            Load::linear(0.0, 2.5, 1.0, 3.0).to_string(),
            "Linear Load: from 1 kN/m at 0 m to 3 kN/m at 2.5 m"
        );
        assert_eq!(Load::moment(1.0, -4.0).describe(), "Moment Load: -4 kN·m at 1 m");
    }

    #[test]
    fn test_max_magnitude() {
        assert_eq!(Load::linear(0.0, 1.0, -6.0, 2.0).max_magnitude(), 6.0);
        assert_eq!(Load::point(0.0, -3.0).max_magnitude(), 3.0);
    }

    #[test]
    fn test_serialization_tags() {
        let load = Load::linear(0.0, 2.0, 1.0, 3.0);
        let json = serde_json::to_string(&load).unwrap();
        assert!(json.contains("\"type\":\"linear\""));
        assert!(json.contains("\"start_mag\":1.0"));

        let custom: Load =
            serde_json::from_str(r#"{"type":"custom","start":0.0,"end":1.0,"expression":"x"}"#).unwrap();
        assert_eq!(custom.kind(), LoadKind::Custom);
    }
}
