//! User-defined distributed loads.
//!
//! A custom load's intensity is an [`evalexpr`] formula in the beam position
//! `x`, for example `"2 + 0.5 * x"` or `"math::sin(x)"`. There is no closed
//! form for its resultant, so an [`EffectTable`] is built once per sweep by
//! forward Riemann accumulation and then read in O(1) per cut.
//!
//! Note that evalexpr keeps integer arithmetic for integer literals:
//! `"1 / 2"` is `0`, write `"1.0 / 2"` for one half.

use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Node, Value};
use serde::{Deserialize, Serialize};

use crate::effect::LoadEffect;
use crate::errors::{BeamError, BeamResult};
use crate::settings::{AnalysisSettings, INDEX_TOLERANCE};

/// A parsed intensity formula `w(x)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expression {
    source: String,
    tree: Node,
}

impl Expression {
    /// Name of the position variable inside formulas
    pub const VARIABLE: &'static str = "x";

    pub fn parse(source: impl Into<String>) -> BeamResult<Self> {
        let source = source.into();
        let tree = build_operator_tree(&source).map_err(|e| BeamError::invalid_expression(&source, e))?;
        Ok(Expression { source, tree })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate the intensity (kN/m) at position `x`
    pub fn intensity_at(&self, x: f64) -> BeamResult<f64> {
        let mut context = HashMapContext::new();
        self.eval_in(&mut context, x)
    }

    fn eval_in(&self, context: &mut HashMapContext, x: f64) -> BeamResult<f64> {
        context
            .set_value(Self::VARIABLE.into(), Value::Float(x))
            .map_err(|e| BeamError::invalid_expression(&self.source, e))?;
        let w = self
            .tree
            .eval_number_with_context(&*context)
            .map_err(|e| BeamError::invalid_expression(&self.source, e))?;
        if !w.is_finite() {
            return Err(BeamError::invalid_expression(
                &self.source,
                format!("evaluates to {} at x = {} m", w, x),
            ));
        }
        Ok(w)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl TryFrom<String> for Expression {
    type Error = BeamError;

    fn try_from(source: String) -> BeamResult<Self> {
        Expression::parse(source)
    }
}

impl From<Expression> for String {
    fn from(expr: Expression) -> String {
        expr.source
    }
}

/// Distributed load with intensity `expression` over `[start, end]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLoad {
    /// Start position (m)
    pub start: f64,
    /// End position (m)
    pub end: f64,
    /// Intensity formula in `x` (kN/m)
    pub expression: Expression,
}

impl CustomLoad {
    /// Peak absolute intensity, sampled at 100 intervals over the span.
    ///
    /// Samples where the formula fails to evaluate are skipped.
    pub fn max_magnitude(&self) -> f64 {
        const SAMPLES: usize = 100;
        let mut context = HashMapContext::new();
        (0..=SAMPLES)
            .filter_map(|i| {
                let x = self.start + (self.end - self.start) * i as f64 / SAMPLES as f64;
                self.expression.eval_in(&mut context, x).ok()
            })
            .fold(0.0f64, |acc, w| acc.max(w.abs()))
    }

    pub fn describe(&self) -> String {
        format!(
            "Custom Load: w(x) = {} kN/m from {} m to {} m",
            self.expression.source(),
            self.start,
            self.end
        )
    }
}

/// Precomputed resultants of one custom load for one `(length, step)` sweep.
///
/// Entry `i` holds the running force `F_i = ∫ w ds` and first moment
/// `Q_i = ∫ w·s ds` over `[start, min(i·step, end)]`. The effect at a cut `x`
/// is `{F_i, F_i·x − Q_i}` with `i = floor(x / step)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTable {
    length: f64,
    step: f64,
    start: f64,
    end: f64,
    source: String,
    force: Vec<f64>,
    first_moment: Vec<f64>,
}

impl EffectTable {
    /// Integrate `load` over a beam of `length` at the settings' step.
    pub fn build(load: &CustomLoad, length: f64, settings: &AnalysisSettings) -> BeamResult<Self> {
        let step = settings.step;
        let substeps = settings.quadrature_substeps.max(1);
        let cells = (length / step - INDEX_TOLERANCE).ceil().max(0.0) as usize;

        let mut context = HashMapContext::new();
        let mut force = Vec::with_capacity(cells + 1);
        let mut first_moment = Vec::with_capacity(cells + 1);
        let (mut f, mut q) = (0.0, 0.0);
        force.push(f);
        first_moment.push(q);

        for i in 0..cells {
            let lo = (i as f64 * step).max(load.start);
            let hi = ((i + 1) as f64 * step).min(load.end);
            if hi > lo {
                let h = (hi - lo) / substeps as f64;
                for k in 0..substeps {
                    let s = lo + (k as f64 + 0.5) * h;
                    let w = load.expression.eval_in(&mut context, s)?;
                    f += w * h;
                    q += w * s * h;
                }
            }
            force.push(f);
            first_moment.push(q);
        }

        let table = EffectTable {
            length,
            step,
            start: load.start,
            end: load.end,
            source: load.expression.source().to_string(),
            force,
            first_moment,
        };
        log::trace!(
            "Built effect table for w(x) = {} over [{}, {}] m: {} entries, resultant {:.6} kN",
            table.source,
            table.start,
            table.end,
            table.len(),
            table.total_force()
        );
        Ok(table)
    }

    /// True when this table was integrated from `load`
    pub fn built_for(&self, load: &CustomLoad) -> bool {
        self.start == load.start && self.end == load.end && self.source == load.expression.source()
    }

    /// True when this table was built for exactly this sweep
    pub fn matches(&self, length: f64, step: f64) -> bool {
        self.length == length && self.step == step
    }

    /// Reject a table integrated from another load or built for another sweep
    pub fn check(&self, load: &CustomLoad, length: f64, step: f64) -> BeamResult<()> {
        if !self.built_for(load) {
            Err(BeamError::MissingEffectTable {
                load: load.describe(),
            })
        } else if self.matches(length, step) {
            Ok(())
        } else {
            Err(BeamError::StaleEffectTable {
                table_length: self.length,
                table_step: self.step,
                length,
                step,
            })
        }
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Resultant of the whole load
    pub fn total_force(&self) -> f64 {
        self.force.last().copied().unwrap_or(0.0)
    }

    pub fn effect_at(&self, x: f64) -> LoadEffect {
        if x < self.start || self.force.is_empty() {
            return LoadEffect::ZERO;
        }
        let last = self.force.len() - 1;
        let i = if x >= self.end {
            last
        } else {
            ((x / self.step + INDEX_TOLERANCE).floor().max(0.0) as usize).min(last)
        };
        let f = self.force[i];
        LoadEffect::new(f, f * x - self.first_moment[i])
    }
}
