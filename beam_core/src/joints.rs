//! Supports (joints) and their solved reactions
//!
//! A [`Joint`] is a support position with a kind that fixes how many reaction
//! components it can provide. Reactions are not stored on the joint; the
//! solver returns [`Reactions`] keyed by [`JointId`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BeamError, BeamResult};

/// Stable identity of a joint, used to look up its reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointId(pub Uuid);

impl JointId {
    pub fn new() -> Self {
        JointId(Uuid::new_v4())
    }
}

impl Default for JointId {
    fn default() -> Self {
        JointId::new()
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Support kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointKind {
    /// Vertical reaction only
    Roller,
    /// Vertical and horizontal reactions
    Pinned,
    /// Vertical, horizontal and moment reactions
    Fixed,
}

impl JointKind {
    pub const ALL: [JointKind; 3] = [JointKind::Roller, JointKind::Pinned, JointKind::Fixed];

    pub fn tag(&self) -> &'static str {
        match self {
            JointKind::Roller => "roller",
            JointKind::Pinned => "pinned",
            JointKind::Fixed => "fixed",
        }
    }

    /// Number of unknown reaction components
    pub fn unknowns(&self) -> usize {
        match self {
            JointKind::Roller => 1,
            JointKind::Pinned => 2,
            JointKind::Fixed => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            JointKind::Roller => "Roller",
            JointKind::Pinned => "Pinned",
            JointKind::Fixed => "Fixed",
        }
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for JointKind {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        JointKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| BeamError::invalid_argument("type", s, "Invalid joint type"))
    }
}

/// A support on the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    #[serde(default)]
    pub id: JointId,
    #[serde(rename = "type")]
    pub kind: JointKind,
    /// Position along the beam (m)
    pub pos: f64,
}

impl Joint {
    pub fn new(kind: JointKind, pos: f64) -> Self {
        Joint {
            id: JointId::new(),
            kind,
            pos,
        }
    }

    pub fn roller(pos: f64) -> Self {
        Joint::new(JointKind::Roller, pos)
    }

    pub fn pinned(pos: f64) -> Self {
        Joint::new(JointKind::Pinned, pos)
    }

    pub fn fixed(pos: f64) -> Self {
        Joint::new(JointKind::Fixed, pos)
    }

    pub fn unknowns(&self) -> usize {
        self.kind.unknowns()
    }

    pub fn check_bounds(&self, length: f64) -> BeamResult<()> {
        if (0.0..=length).contains(&self.pos) {
            Ok(())
        } else {
            Err(BeamError::out_of_bounds(
                self.describe(),
                length,
                format!("Joint at position {} m is out of beam bounds", self.pos),
            ))
        }
    }

    pub fn describe(&self) -> String {
        format!("{} Joint at {} m", self.kind.display_name(), self.pos)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Solved reaction components of one joint.
///
/// Components a joint cannot provide stay at zero. `rx` is always zero since
/// no horizontal loads are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reaction {
    /// Vertical reaction (kN), positive upward
    pub ry: f64,
    /// Horizontal reaction (kN)
    pub rx: f64,
    /// Moment reaction (kN·m)
    pub rm: f64,
}

impl Reaction {
    pub fn vertical(ry: f64) -> Self {
        Reaction {
            ry,
            ..Reaction::default()
        }
    }
}

/// Reactions of every joint, keyed by joint identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reactions(HashMap<JointId, Reaction>);

impl Reactions {
    pub fn new() -> Self {
        Reactions(HashMap::new())
    }

    pub fn insert(&mut self, id: JointId, reaction: Reaction) {
        self.0.insert(id, reaction);
    }

    pub fn get(&self, id: &JointId) -> Option<&Reaction> {
        self.0.get(id)
    }

    /// Reaction of `joint`, zero if it was not part of the solve
    pub fn of(&self, joint: &Joint) -> Reaction {
        self.get(&joint.id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of vertical reactions
    pub fn total_vertical(&self) -> f64 {
        self.0.values().map(|r| r.ry).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_counts() {
        assert_eq!(Joint::roller(0.0).unknowns(), 1);
        assert_eq!(Joint::pinned(0.0).unknowns(), 2);
        assert_eq!(Joint::fixed(0.0).unknowns(), 3);
    }

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(Joint::roller(1.0).id, Joint::roller(1.0).id);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(" Fixed ".parse::<JointKind>().unwrap(), JointKind::Fixed);
        assert!(matches!(
            "hinge".parse::<JointKind>(),
            Err(BeamError::InvalidConstructorArgument { .. })
        ));
    }

    #[test]
    fn test_bounds() {
        assert!(Joint::pinned(10.0).check_bounds(10.0).is_ok());
        assert!(Joint::pinned(-0.5).check_bounds(10.0).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Joint::roller(7.5).describe(), "Roller Joint at 7.5 m");
    }

    #[test]
    fn test_reactions_lookup() {
        let a = Joint::pinned(0.0);
        let b = Joint::roller(10.0);
        let mut reactions = Reactions::new();
        reactions.insert(a.id, Reaction::vertical(4.0));
        reactions.insert(b.id, Reaction::vertical(6.0));
        assert_eq!(reactions.of(&a).ry, 4.0);
        assert_eq!(reactions.total_vertical(), 10.0);
        assert_eq!(reactions.of(&Joint::fixed(0.0)), Reaction::default());
    }

    #[test]
    fn test_joint_json_without_id() {
        let joint: Joint = serde_json::from_str(r#"{"type":"roller","pos":3.0}"#).unwrap();
        assert_eq!(joint.kind, JointKind::Roller);
        assert_eq!(joint.pos, 3.0);
    }
}
