//! Equilibrium Solver
//!
//! Solves the support reactions of a determinate beam from global
//! equilibrium. Only two configurations are supported:
//!
//! - **Simply supported**: one pinned joint at `a` and one roller at `b`
//! - **Cantilever**: a single fixed joint at `p`
//!
//! ## Derivation
//!
//! Every load is evaluated fully loaded at the far end of the beam, giving the
//! net downward force `F` and the net moment `Mn` about `x = L`. The sweep
//! closes the bending moment to zero at `x = L`, so the reactions must satisfy
//! the same balance taken about the right end:
//!
//! ```text
//! simply supported:  Ra + Rb = F
//!                    Ra (L - a) + Rb (L - b) = Mn
//!                    => Ra = (Mn - F (L - b)) / (b - a),  Rb = F - Ra
//!
//! cantilever:        Ry = F
//!                    Ry (L - p) - Rm = Mn
//!                    => Rm = F (L - p) - Mn
//! ```
//!
//! Horizontal reactions are zero: no horizontal loads are modeled.

use serde::{Deserialize, Serialize};

use crate::effect::LoadEffect;
use crate::errors::{BeamError, BeamResult};
use crate::joints::{Joint, JointKind, Reaction, Reactions};
use crate::loads::PreparedLoad;
use crate::settings::REACTION_TOLERANCE;

/// Net resultant of all loads, evaluated at the right end of the beam
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetLoad {
    /// Net downward force (kN)
    pub force: f64,
    /// Net moment about the right end (kN·m)
    pub moment: f64,
}

/// Recognized support layout, holding indices into the joint list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportConfiguration {
    SimplySupported { pinned: usize, roller: usize },
    Cantilever { fixed: usize },
}

impl SupportConfiguration {
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportConfiguration::SimplySupported { .. } => "Simply supported (pinned + roller)",
            SupportConfiguration::Cantilever { .. } => "Cantilever (fixed)",
        }
    }
}

/// Outcome of a solve
#[derive(Debug, Clone, PartialEq)]
pub struct Equilibrium {
    pub configuration: SupportConfiguration,
    pub net: NetLoad,
    pub reactions: Reactions,
}

/// Sum every load's resultant at `x = length`
pub fn net_load(length: f64, loads: &[PreparedLoad<'_>]) -> NetLoad {
    let total: LoadEffect = loads.iter().map(|load| load.effect_at(length)).sum();
    NetLoad {
        force: total.force,
        moment: total.moment,
    }
}

fn joint_summary(joints: &[Joint]) -> String {
    joints
        .iter()
        .map(|j| j.describe())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Identify which supported configuration `joints` form
pub fn classify(joints: &[Joint]) -> BeamResult<SupportConfiguration> {
    let find = |kind: JointKind| joints.iter().position(|j| j.kind == kind);

    match joints.len() {
        1 if joints[0].kind == JointKind::Fixed => Ok(SupportConfiguration::Cantilever { fixed: 0 }),
        2 => match (find(JointKind::Pinned), find(JointKind::Roller)) {
            (Some(pinned), Some(roller)) => {
                if joints[pinned].pos == joints[roller].pos {
                    Err(BeamError::unsupported_configuration(
                        joint_summary(joints),
                        "Pinned and roller joints must be at different positions",
                    ))
                } else {
                    Ok(SupportConfiguration::SimplySupported { pinned, roller })
                }
            }
            _ => Err(BeamError::unsupported_configuration(
                joint_summary(joints),
                "Two supports must be one pinned and one roller joint",
            )),
        },
        _ => Err(BeamError::unsupported_configuration(
            joint_summary(joints),
            "Expected one fixed joint, or one pinned and one roller joint",
        )),
    }
}

/// Solve reactions, also returning the configuration and net load
pub fn solve(length: f64, loads: &[PreparedLoad<'_>], joints: &[Joint]) -> BeamResult<Equilibrium> {
    let configuration = classify(joints)?;
    let net = net_load(length, loads);
    log::debug!(
        "Net downward force on beam: {} kN, net moment about right end: {} kN·m",
        net.force,
        net.moment
    );

    let mut reactions = Reactions::new();
    match configuration {
        SupportConfiguration::SimplySupported { pinned, roller } => {
            let (a, b) = (&joints[pinned], &joints[roller]);
            let mut ra = (net.moment - net.force * (length - b.pos)) / (b.pos - a.pos);
            let mut rb = net.force - ra;

            // A load resting on one support leaves round-off on the other
            let tolerance = REACTION_TOLERANCE * net.force.abs().max(net.moment.abs() / length).max(1.0);
            if rb.abs() <= tolerance {
                rb = 0.0;
                ra = net.force;
            } else if ra.abs() <= tolerance {
                ra = 0.0;
                rb = net.force;
            }
            reactions.insert(a.id, Reaction::vertical(ra));
            reactions.insert(b.id, Reaction::vertical(rb));
        }
        SupportConfiguration::Cantilever { fixed } => {
            let joint = &joints[fixed];
            reactions.insert(
                joint.id,
                Reaction {
                    ry: net.force,
                    rx: 0.0,
                    rm: net.force * (length - joint.pos) - net.moment,
                },
            );
        }
    }

    log::debug!(
        "{}: solved {} joint reactions, total vertical {} kN",
        configuration.display_name(),
        reactions.len(),
        reactions.total_vertical()
    );

    Ok(Equilibrium {
        configuration,
        net,
        reactions,
    })
}

/// Solve support reactions of `joints` under `loads`
pub fn solve_reactions(length: f64, loads: &[PreparedLoad<'_>], joints: &[Joint]) -> BeamResult<Reactions> {
    solve(length, loads, joints).map(|eq| eq.reactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{prepare_loads, Load};
    use crate::settings::AnalysisSettings;
    use approx::assert_relative_eq;

    fn reactions_for(length: f64, loads: &[Load], joints: &[Joint]) -> BeamResult<Reactions> {
        let settings = AnalysisSettings::default().with_step(0.01);
        let prepared = prepare_loads(loads, length, &settings)?;
        solve_reactions(length, &prepared, joints)
    }

    #[test]
    fn test_simply_supported_midspan_point() {
        let joints = [Joint::pinned(0.0), Joint::roller(10.0)];
        let r = reactions_for(10.0, &[Load::point(5.0, 10.0)], &joints).unwrap();
        assert_relative_eq!(r.of(&joints[0]).ry, 5.0);
        assert_relative_eq!(r.of(&joints[1]).ry, 5.0);
        assert_eq!(r.of(&joints[0]).rx, 0.0);
    }

    #[test]
    fn test_point_loads_sum_to_reactions() {
        let loads = [
            Load::point(1.0, 3.0),
            Load::point(4.5, 7.0),
            Load::point(9.0, 2.5),
            Load::point(10.0, 1.0),
        ];
        // Roller listed first and pinned off the end
        let joints = [Joint::roller(8.0), Joint::pinned(2.0)];
        let r = reactions_for(10.0, &loads, &joints).unwrap();
        assert_relative_eq!(r.total_vertical(), 13.5, epsilon = 1e-12);
    }

    #[test]
    fn test_load_on_support_leaves_other_unloaded() {
        let joints = [Joint::pinned(0.2), Joint::roller(0.7)];
        let r = reactions_for(1.0, &[Load::point(0.2, 10.0)], &joints).unwrap();
        assert_eq!(r.of(&joints[1]).ry, 0.0);
        assert_eq!(r.of(&joints[0]).ry, 10.0);

        let joints = [Joint::roller(0.3), Joint::pinned(0.9)];
        let r = reactions_for(1.0, &[Load::point(0.3, 4.0)], &joints).unwrap();
        assert_eq!(r.of(&joints[1]).ry, 0.0);
        assert_eq!(r.of(&joints[0]).ry, 4.0);
    }

    #[test]
    fn test_overhang_reactions() {
        // 10 kN at the free tip, supports at 2 m and 8 m
        let joints = [Joint::pinned(2.0), Joint::roller(8.0)];
        let r = reactions_for(10.0, &[Load::point(10.0, 10.0)], &joints).unwrap();
        assert_relative_eq!(r.of(&joints[1]).ry, 80.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(r.of(&joints[0]).ry, -20.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_applied_couple_reactions() {
        let joints = [Joint::pinned(0.0), Joint::roller(10.0)];
        let r = reactions_for(10.0, &[Load::moment(5.0, 10.0)], &joints).unwrap();
        assert_relative_eq!(r.of(&joints[0]).ry, 1.0);
        assert_relative_eq!(r.of(&joints[1]).ry, -1.0);
    }

    #[test]
    fn test_cantilever_uniform() {
        let joints = [Joint::fixed(0.0)];
        let r = reactions_for(4.0, &[Load::uniform(0.0, 4.0, 2.0)], &joints).unwrap();
        let fixed = r.of(&joints[0]);
        assert_relative_eq!(fixed.ry, 8.0);
        assert_relative_eq!(fixed.rm, 16.0);
        assert_eq!(fixed.rx, 0.0);
    }

    #[test]
    fn test_cantilever_independent_of_order() {
        let joints = [Joint::fixed(0.0)];
        let mut loads = vec![
            Load::point(1.0, 4.0),
            Load::linear(0.5, 3.0, 1.0, 2.0),
            Load::moment(2.0, -3.0),
            Load::parabolic(1.0, 4.0, 0.0, 2.0),
        ];
        let forward = reactions_for(4.0, &loads, &joints).unwrap().of(&joints[0]);
        loads.reverse();
        let backward = reactions_for(4.0, &loads, &joints).unwrap().of(&joints[0]);
        assert_relative_eq!(forward.ry, backward.ry, epsilon = 1e-12);
        assert_relative_eq!(forward.rm, backward.rm, epsilon = 1e-12);

        // Net moment about the fixed point
        let expected_rm = 4.0 * 1.0 + 3.75 * (0.5 + 2.5 * 5.0 / 9.0) + 3.0 + 2.0 * (1.0 + 2.25);
        assert_relative_eq!(forward.rm, expected_rm, epsilon = 1e-9);
    }

    #[test]
    fn test_cantilever_fixed_at_right_end() {
        let joints = [Joint::fixed(6.0)];
        let r = reactions_for(6.0, &[Load::point(0.0, 5.0)], &joints).unwrap();
        let fixed = r.of(&joints[0]);
        assert_relative_eq!(fixed.ry, 5.0);
        assert_relative_eq!(fixed.rm, -30.0);
    }

    #[test]
    fn test_unsupported_configurations() {
        let cases = [
            vec![Joint::roller(0.0), Joint::roller(10.0)],
            vec![Joint::pinned(0.0), Joint::pinned(10.0)],
            vec![Joint::pinned(5.0), Joint::roller(5.0)],
            vec![Joint::pinned(0.0)],
            vec![Joint::roller(0.0), Joint::roller(5.0), Joint::roller(10.0)],
            vec![],
        ];
        for joints in cases {
            let err = reactions_for(10.0, &[Load::point(5.0, 1.0)], &joints).unwrap_err();
            assert_eq!(err.error_code(), "UNSUPPORTED_CONFIGURATION", "{:?}", joints);
        }
    }

    #[test]
    fn test_net_load_includes_custom() {
        let settings = AnalysisSettings::default().with_step(0.01);
        let loads = [Load::custom(0.0, 4.0, "2.0").unwrap(), Load::point(4.0, 1.0)];
        let prepared = prepare_loads(&loads, 4.0, &settings).unwrap();
        let net = net_load(4.0, &prepared);
        assert_relative_eq!(net.force, 9.0, epsilon = 1e-9);
        assert_relative_eq!(net.moment, 16.0, epsilon = 1e-9);
    }
}
