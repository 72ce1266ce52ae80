//! Internal force and moment produced by one load or reaction at a cut.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Shear force and bending moment contribution at a cut position.
///
/// Force is positive downward and moment positive clockwise, matching the
/// load sign convention. The sweep negates these when accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadEffect {
    /// Resultant force (kN)
    pub force: f64,
    /// Resultant moment about the cut (kN·m)
    pub moment: f64,
}

impl LoadEffect {
    /// No contribution (cut lies before the load)
    pub const ZERO: LoadEffect = LoadEffect {
        force: 0.0,
        moment: 0.0,
    };

    pub fn new(force: f64, moment: f64) -> Self {
        LoadEffect { force, moment }
    }

    /// Resultant `force` acting at `centroid`, seen from a cut at `x`
    pub fn resultant(force: f64, centroid: f64, x: f64) -> Self {
        LoadEffect {
            force,
            moment: force * (x - centroid),
        }
    }
}

impl Add for LoadEffect {
    type Output = LoadEffect;

    fn add(self, rhs: LoadEffect) -> LoadEffect {
        LoadEffect {
            force: self.force + rhs.force,
            moment: self.moment + rhs.moment,
        }
    }
}

impl AddAssign for LoadEffect {
    fn add_assign(&mut self, rhs: LoadEffect) {
        self.force += rhs.force;
        self.moment += rhs.moment;
    }
}

impl std::iter::Sum for LoadEffect {
    fn sum<I: Iterator<Item = LoadEffect>>(iter: I) -> LoadEffect {
        iter.fold(LoadEffect::ZERO, |acc, e| acc + e)
    }
}
