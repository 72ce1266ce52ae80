//! Beam orchestration
//!
//! A [`Beam`] owns its loads and joints. Analysis runs in two steps:
//!
//! 1. [`Beam::verify`] checks geometry and determinacy, prepares the loads,
//!    solves the reactions and checks that rollers only push. It returns a
//!    [`SolvedBeam`] that borrows the beam, so loads and joints cannot change
//!    while its reactions are in use.
//! 2. [`SolvedBeam::sweep`] samples the shear force and bending moment
//!    diagrams.
//!
//! [`Beam::calculate_beam`] runs both.
//!
//! ## Sign Convention
//! - Loads: positive downward, applied moments positive clockwise
//! - Reactions: positive upward
//! - Diagrams sum everything left of the cut; loads subtract, reactions add
//!
//! ## Example
//! ```rust
//! use beam_core::beam::Beam;
//! use beam_core::joints::Joint;
//! use beam_core::loads::Load;
//! use beam_core::settings::AnalysisSettings;
//!
//! let mut beam = Beam::new(10.0).unwrap();
//! beam.add_joint(Joint::pinned(0.0));
//! beam.add_joint(Joint::roller(10.0));
//! beam.add_load(Load::point(5.0, 10.0));
//!
//! let diagrams = beam.calculate_beam(&AnalysisSettings::default().with_step(0.01)).unwrap();
//! let peak = diagrams.extremes().max_moment;
//! assert!((peak.y - 25.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};
use crate::joints::{Joint, JointId, JointKind, Reaction, Reactions};
use crate::loads::{prepare_loads, Load, PreparedLoad};
use crate::settings::AnalysisSettings;
use crate::solver::{self, NetLoad, SupportConfiguration};

/// One sample of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramPoint {
    /// Position along the beam (m)
    pub x: f64,
    /// Shear (kN) or moment (kN·m)
    pub y: f64,
}

/// Shear force and bending moment diagrams, sampled at the same positions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagrams {
    pub sfd: Vec<DiagramPoint>,
    pub bmd: Vec<DiagramPoint>,
}

/// Largest absolute shear and moment with their positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub max_shear: DiagramPoint,
    pub max_moment: DiagramPoint,
}

fn peak(points: &[DiagramPoint]) -> DiagramPoint {
    points
        .iter()
        .copied()
        .fold(DiagramPoint { x: 0.0, y: 0.0 }, |best, p| {
            if p.y.abs() > best.y.abs() {
                p
            } else {
                best
            }
        })
}

impl Diagrams {
    pub fn len(&self) -> usize {
        self.sfd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sfd.is_empty()
    }

    pub fn extremes(&self) -> Extremes {
        Extremes {
            max_shear: peak(&self.sfd),
            max_moment: peak(&self.bmd),
        }
    }

    /// Shear and moment at the sample nearest to `x`
    pub fn nearest(&self, x: f64) -> Option<(f64, f64)> {
        let index = self
            .sfd
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
            .map(|(i, _)| i)?;
        Some((self.sfd[index].y, self.bmd[index].y))
    }
}

/// A straight beam with its loads and supports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beam {
    length: f64,
    loads: Vec<Load>,
    joints: Vec<Joint>,
}

impl Beam {
    /// Create an empty beam of `length` (m)
    pub fn new(length: f64) -> BeamResult<Self> {
        Beam::with_parts(length, Vec::new(), Vec::new())
    }

    /// Create a beam with initial loads and joints
    pub fn with_parts(length: f64, loads: Vec<Load>, joints: Vec<Joint>) -> BeamResult<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(BeamError::invalid_input(
                "length",
                length.to_string(),
                "Beam length must be a positive number",
            ));
        }
        Ok(Beam {
            length,
            loads,
            joints,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn add_load(&mut self, load: Load) {
        self.loads.push(load);
    }

    pub fn add_joint(&mut self, joint: Joint) {
        self.joints.push(joint);
    }

    /// Add a load and return self (builder pattern)
    pub fn with_load(mut self, load: Load) -> Self {
        self.loads.push(load);
        self
    }

    /// Add a joint and return self (builder pattern)
    pub fn with_joint(mut self, joint: Joint) -> Self {
        self.joints.push(joint);
        self
    }

    /// Total reaction unknowns across all joints
    pub fn unknowns(&self) -> usize {
        self.joints.iter().map(Joint::unknowns).sum()
    }

    fn check_geometry(&self) -> BeamResult<()> {
        for load in &self.loads {
            load.check_bounds(self.length)?;
        }
        for joint in &self.joints {
            joint.check_bounds(self.length)?;
        }

        let unknowns = self.unknowns();
        if unknowns > 3 {
            return Err(BeamError::Indeterminate { unknowns });
        } else if unknowns < 3 {
            return Err(BeamError::Unstable { unknowns });
        }
        Ok(())
    }

    /// Validate the beam and solve its reactions
    pub fn verify(&self, settings: &AnalysisSettings) -> BeamResult<SolvedBeam<'_>> {
        settings.validate()?;
        self.check_geometry()?;

        let prepared = prepare_loads(&self.loads, self.length, settings)?;
        let equilibrium = solver::solve(self.length, &prepared, &self.joints)?;

        for joint in self.joints.iter().filter(|j| j.kind == JointKind::Roller) {
            let ry = equilibrium.reactions.of(joint).ry;
            if ry < 0.0 {
                return Err(BeamError::InvalidSupport { pos: joint.pos, ry });
            }
        }

        Ok(SolvedBeam {
            beam: self,
            settings: settings.clone(),
            loads: prepared,
            configuration: equilibrium.configuration,
            net: equilibrium.net,
            reactions: equilibrium.reactions,
        })
    }

    /// Verify, solve and sweep in one call
    pub fn calculate_beam(&self, settings: &AnalysisSettings) -> BeamResult<Diagrams> {
        Ok(self.verify(settings)?.sweep())
    }
}

/// A verified beam with solved reactions
#[derive(Debug, Clone)]
pub struct SolvedBeam<'a> {
    beam: &'a Beam,
    settings: AnalysisSettings,
    loads: Vec<PreparedLoad<'a>>,
    configuration: SupportConfiguration,
    net: NetLoad,
    reactions: Reactions,
}

/// Reaction of one joint, for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointReaction {
    pub id: JointId,
    pub description: String,
    #[serde(flatten)]
    pub reaction: Reaction,
}

/// Serializable summary of a complete analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamReport {
    pub length: f64,
    pub configuration: SupportConfiguration,
    pub net: NetLoad,
    pub reactions: Vec<JointReaction>,
    pub extremes: Extremes,
    pub diagrams: Diagrams,
}

impl<'a> SolvedBeam<'a> {
    pub fn beam(&self) -> &'a Beam {
        self.beam
    }

    pub fn configuration(&self) -> SupportConfiguration {
        self.configuration
    }

    pub fn net_load(&self) -> NetLoad {
        self.net
    }

    pub fn reactions(&self) -> &Reactions {
        &self.reactions
    }

    /// Reaction of `joint`, zero if it is not on this beam
    pub fn reaction_of(&self, joint: &Joint) -> Reaction {
        self.reactions.of(joint)
    }

    /// Sample the shear force and bending moment diagrams
    pub fn sweep(&self) -> Diagrams {
        let length = self.beam.length;
        let step = self.settings.step;
        let last = self.settings.last_index(length);
        if !self.settings.divides(length) {
            log::warn!(
                "Step {} m does not divide beam length {} m; last sample at {} m",
                step,
                length,
                last as f64 * step
            );
        }

        // Cuts this close to a load or joint position land exactly on it, so
        // loads and joints at the same place switch on at the same sample
        let tolerance = step * 1e-6;
        let anchors: Vec<f64> = self
            .beam
            .loads
            .iter()
            .flat_map(|load| {
                let (start, end) = load.extent();
                [start, end]
            })
            .chain(self.beam.joints.iter().map(|joint| joint.pos))
            .chain(std::iter::once(length))
            .collect();

        let mut diagrams = Diagrams {
            sfd: Vec::with_capacity(last + 1),
            bmd: Vec::with_capacity(last + 1),
        };

        for i in 0..=last {
            let mut x = i as f64 * step;
            if let Some(&anchor) = anchors.iter().find(|&&a| (x - a).abs() <= tolerance) {
                x = anchor;
            }

            let mut v = 0.0;
            let mut m = 0.0;
            for load in &self.loads {
                let effect = load.effect_at(x);
                v -= effect.force;
                m -= effect.moment;
            }

            for joint in self.beam.joints.iter().filter(|j| j.pos <= x) {
                let r = self.reactions.of(joint);
                v += r.ry;
                m += r.ry * (x - joint.pos);
                if joint.kind == JointKind::Fixed {
                    m -= r.rm;
                }
            }

            diagrams.sfd.push(DiagramPoint { x, y: v });
            diagrams.bmd.push(DiagramPoint { x, y: m });
        }

        log::debug!("Swept {} samples at {} m", diagrams.len(), step);
        diagrams
    }

    /// Sweep and collect everything into a serializable report
    pub fn report(&self) -> BeamReport {
        let diagrams = self.sweep();
        BeamReport {
            length: self.beam.length,
            configuration: self.configuration,
            net: self.net,
            reactions: self
                .beam
                .joints
                .iter()
                .map(|joint| JointReaction {
                    id: joint.id,
                    description: joint.describe(),
                    reaction: self.reactions.of(joint),
                })
                .collect(),
            extremes: diagrams.extremes(),
            diagrams,
        }
    }
}
