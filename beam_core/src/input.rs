//! # Input Model
//!
//! Loosely typed records for building beams from raw input (JSON files, form
//! fields). Each record carries a kind tag and optional fields; conversion to
//! [`Load`] / [`Joint`] checks the tag and that the fields the kind needs are
//! present.
//!
//! ## JSON Format
//! ```json
//! {
//!   "length": 10.0,
//!   "loads": [
//!     { "type": "point", "pos": 5.0, "mag": 10.0 },
//!     { "type": "custom", "start": 0.0, "end": 10.0, "expression": "0.2 * x" }
//!   ],
//!   "joints": [
//!     { "type": "pinned", "pos": 0.0 },
//!     { "type": "roller", "pos": 10.0 }
//!   ],
//!   "settings": { "step": 0.01 }
//! }
//! ```
//!
//! ## Example
//! ```rust
//! use beam_core::input::BeamModel;
//!
//! let model = BeamModel::from_json(r#"{
//!     "length": 4.0,
//!     "loads": [{ "type": "uniform", "start": 0.0, "end": 4.0, "mag": 2.0 }],
//!     "joints": [{ "type": "fixed", "pos": 0.0 }]
//! }"#).unwrap();
//! let beam = model.to_beam().unwrap();
//! assert_eq!(beam.loads().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::beam::Beam;
use crate::errors::{BeamError, BeamResult};
use crate::joints::{Joint, JointKind};
use crate::loads::{Load, LoadKind};
use crate::settings::AnalysisSettings;

fn require(kind: impl std::fmt::Display, field: &str, value: Option<f64>) -> BeamResult<f64> {
    value.ok_or_else(|| {
        BeamError::invalid_argument(field, "missing", format!("A {} load requires '{}'", kind, field))
    })
}

/// Raw load record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mag: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_mag: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl TryFrom<LoadSpec> for Load {
    type Error = BeamError;

    fn try_from(spec: LoadSpec) -> BeamResult<Load> {
        let kind: LoadKind = spec.kind.parse()?;
        let need = |field: &str, value: Option<f64>| require(kind, field, value);

        let load = match kind {
            LoadKind::Point => Load::point(need("pos", spec.pos)?, need("mag", spec.mag)?),
            LoadKind::Moment => Load::moment(need("pos", spec.pos)?, need("mag", spec.mag)?),
            LoadKind::Uniform => Load::uniform(
                need("start", spec.start)?,
                need("end", spec.end)?,
                need("mag", spec.mag)?,
            ),
            LoadKind::Linear => Load::linear(
                need("start", spec.start)?,
                need("end", spec.end)?,
                need("start_mag", spec.start_mag)?,
                need("end_mag", spec.end_mag)?,
            ),
            LoadKind::Parabolic => Load::parabolic(
                need("start", spec.start)?,
                need("end", spec.end)?,
                need("start_mag", spec.start_mag)?,
                need("end_mag", spec.end_mag)?,
            ),
            LoadKind::Custom => {
                let expression = spec.expression.as_deref().ok_or_else(|| {
                    BeamError::invalid_argument("expression", "missing", "A custom load requires 'expression'")
                })?;
                Load::custom(need("start", spec.start)?, need("end", spec.end)?, expression)?
            }
        };
        Ok(load)
    }
}

impl From<&Load> for LoadSpec {
    fn from(load: &Load) -> LoadSpec {
        let mut spec = LoadSpec {
            kind: load.kind().tag().to_string(),
            ..LoadSpec::default()
        };
        match load {
            Load::Point { pos, mag } | Load::Moment { pos, mag } => {
                spec.pos = Some(*pos);
                spec.mag = Some(*mag);
            }
            Load::Uniform { start, end, mag } => {
                spec.start = Some(*start);
                spec.end = Some(*end);
                spec.mag = Some(*mag);
            }
            Load::Linear {
                start,
                end,
                start_mag,
                end_mag,
            }
            | Load::Parabolic {
                start,
                end,
                start_mag,
                end_mag,
            } => {
                spec.start = Some(*start);
                spec.end = Some(*end);
                spec.start_mag = Some(*start_mag);
                spec.end_mag = Some(*end_mag);
            }
            Load::Custom(c) => {
                spec.start = Some(c.start);
                spec.end = Some(c.end);
                spec.expression = Some(c.expression.source().to_string());
            }
        }
        spec
    }
}

/// Raw joint record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub pos: f64,
}

impl TryFrom<JointSpec> for Joint {
    type Error = BeamError;

    fn try_from(spec: JointSpec) -> BeamResult<Joint> {
        let kind: JointKind = spec.kind.parse()?;
        Ok(Joint::new(kind, spec.pos))
    }
}

impl From<&Joint> for JointSpec {
    fn from(joint: &Joint) -> JointSpec {
        JointSpec {
            kind: joint.kind.tag().to_string(),
            pos: joint.pos,
        }
    }
}

/// A beam problem as stored in a model file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamModel {
    /// Beam length (m)
    pub length: f64,
    #[serde(default)]
    pub loads: Vec<LoadSpec>,
    #[serde(default)]
    pub joints: Vec<JointSpec>,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

impl BeamModel {
    pub fn from_json(json: &str) -> BeamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> BeamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe an existing beam as a model
    pub fn from_beam(beam: &Beam, settings: AnalysisSettings) -> Self {
        BeamModel {
            length: beam.length(),
            loads: beam.loads().iter().map(LoadSpec::from).collect(),
            joints: beam.joints().iter().map(JointSpec::from).collect(),
            settings,
        }
    }

    /// Build the beam, rejecting unknown kinds and missing fields
    pub fn to_beam(&self) -> BeamResult<Beam> {
        let loads = self
            .loads
            .iter()
            .cloned()
            .map(Load::try_from)
            .collect::<BeamResult<Vec<_>>>()?;
        let joints = self
            .joints
            .iter()
            .cloned()
            .map(Joint::try_from)
            .collect::<BeamResult<Vec<_>>>()?;
        Beam::with_parts(self.length, loads, joints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: &str) -> LoadSpec {
        LoadSpec {
            kind: kind.to_string(),
            ..LoadSpec::default()
        }
    }

    #[test]
    fn test_point_spec() {
        let load = Load::try_from(LoadSpec {
            pos: Some(5.0),
            mag: Some(10.0),
            ..spec("point")
        })
        .unwrap();
        assert_eq!(load, Load::point(5.0, 10.0));
    }

    #[test]
    fn test_unknown_load_kind() {
        let err = Load::try_from(spec("snow")).unwrap_err();
        assert!(matches!(err, BeamError::InvalidConstructorArgument { ref value, .. } if value == "snow"));
    }

    #[test]
    fn test_missing_field() {
        let err = Load::try_from(LoadSpec {
            start: Some(0.0),
            end: Some(2.0),
            start_mag: Some(1.0),
            ..spec("linear")
        })
        .unwrap_err();
        assert!(matches!(err, BeamError::InvalidConstructorArgument { ref field, .. } if field == "end_mag"));

        let err = Load::try_from(LoadSpec {
            start: Some(0.0),
            end: Some(2.0),
            ..spec("custom")
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONSTRUCTOR_ARGUMENT");
    }

    #[test]
    fn test_unknown_joint_kind() {
        let err = Joint::try_from(JointSpec {
            kind: "hinge".into(),
            pos: 0.0,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONSTRUCTOR_ARGUMENT");
    }

    #[test]
    fn test_model_from_json() {
        let model = BeamModel::from_json(
            r#"{
                "length": 10.0,
                "loads": [
                    { "type": "point", "pos": 5.0, "mag": 10.0 },
                    { "type": "parabolic", "start": 0.0, "end": 10.0, "start_mag": 1.0, "end_mag": 3.0 },
                    { "type": "custom", "start": 2.0, "end": 8.0, "expression": "0.5 * x" }
                ],
                "joints": [
                    { "type": "pinned", "pos": 0.0 },
                    { "type": "roller", "pos": 10.0 }
                ],
                "settings": { "step": 0.02 }
            }"#,
        )
        .unwrap();
        assert_eq!(model.settings.step, 0.02);
        assert_eq!(model.settings.quadrature_substeps, 10);

        let beam = model.to_beam().unwrap();
        assert_eq!(beam.loads().len(), 3);
        assert_eq!(beam.joints()[1].kind, JointKind::Roller);
    }

    #[test]
    fn test_shipped_models_analyse() {
        for json in [
            include_str!("../../beam_cli/models/simply_supported.json"),
            include_str!("../../beam_cli/models/cantilever_custom.json"),
        ] {
            let model = BeamModel::from_json(json).unwrap();
            let beam = model.to_beam().unwrap();
            let diagrams = beam.calculate_beam(&model.settings).unwrap();
            assert_eq!(diagrams.len(), model.settings.sample_count(model.length));
            let end = diagrams.bmd[diagrams.len() - 1].y;
            assert!(end.abs() < 1e-6, "moment at free end: {}", end);
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = BeamModel::from_json("{ \"length\": ").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_model_round_trip_through_beam() {
        let beam = Beam::new(6.0)
            .unwrap()
            .with_joint(Joint::fixed(0.0))
            .with_load(Load::linear(0.0, 6.0, 2.0, 0.0))
            .with_load(Load::custom(1.0, 3.0, "x * x").unwrap());
        let model = BeamModel::from_beam(&beam, AnalysisSettings::default());
        let json = model.to_json().unwrap();
        let rebuilt = BeamModel::from_json(&json).unwrap().to_beam().unwrap();
        assert_eq!(rebuilt.loads(), beam.loads());
        assert_eq!(rebuilt.joints()[0].kind, JointKind::Fixed);
    }
}
