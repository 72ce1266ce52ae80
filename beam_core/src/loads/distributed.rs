//! Closed-form resultants for distributed loads.
//!
//! Each function returns the effect of the part of the load lying over
//! `[start, min(x, end)]`, seen from a cut at `x`. Past `end` the force stays
//! at the full resultant and the moment keeps growing with the lever arm.
//!
//! Non-uniform shapes are split into strips (rectangles, triangles and
//! parabolic spandrels) whose areas and centroids are known. The moment of a
//! shape is the sum of `area * (x - centroid)` over its strips, which is the
//! total force times the distance from the cut to the combined centroid.

use crate::effect::LoadEffect;

/// Area and centroid of one piece of a distributed load
#[derive(Debug, Clone, Copy)]
struct Strip {
    area: f64,
    centroid: f64,
}

impl Strip {
    fn new(area: f64, centroid: f64) -> Self {
        Strip { area, centroid }
    }
}

fn combine(strips: &[Strip], x: f64) -> LoadEffect {
    strips
        .iter()
        .map(|s| LoadEffect::resultant(s.area, s.centroid, x))
        .sum()
}

/// Constant intensity `mag` over `[start, end]`
pub fn uniform_effect(start: f64, end: f64, mag: f64, x: f64) -> LoadEffect {
    if x < start {
        LoadEffect::ZERO
    } else if x <= end {
        // Partially loaded: F = w*l, M = w*l^2/2 (= F^2 / 2w)
        let loaded = x - start;
        LoadEffect::new(mag * loaded, mag * loaded * loaded / 2.0)
    } else {
        let span = end - start;
        LoadEffect::resultant(mag * span, start + span / 2.0, x)
    }
}

/// Intensity varying linearly from `start_mag` to `end_mag`
pub fn linear_effect(start: f64, end: f64, start_mag: f64, end_mag: f64, x: f64) -> LoadEffect {
    if x < start {
        return LoadEffect::ZERO;
    }

    let span = end - start;
    let loaded = x.min(end) - start;
    let rise = (end_mag - start_mag) * loaded / span;

    // Keep the triangle height positive: a falling load is a shorter
    // rectangle with the triangle standing on the start side.
    let (rect_height, tri_height, tri_centroid) = if rise >= 0.0 {
        (start_mag, rise, start + 2.0 * loaded / 3.0)
    } else {
        (start_mag + rise, -rise, start + loaded / 3.0)
    };

    combine(
        &[
            Strip::new(rect_height * loaded, start + loaded / 2.0),
            Strip::new(tri_height * loaded / 2.0, tri_centroid),
        ],
        x,
    )
}

/// Quadratic intensity between `start_mag` and `end_mag`.
///
/// The parabola has its vertex at the lower end and reaches the higher
/// magnitude at the other end: `w = low + d * (u / L)^2`, with `u` measured
/// from the lower end and `d = |end_mag - start_mag|`. Equal magnitudes reduce
/// to [`uniform_effect`].
pub fn parabolic_effect(start: f64, end: f64, start_mag: f64, end_mag: f64, x: f64) -> LoadEffect {
    if start_mag == end_mag {
        return uniform_effect(start, end, start_mag, x);
    }
    if x < start {
        return LoadEffect::ZERO;
    }

    let span = end - start;
    let loaded = x.min(end) - start;
    let d = (end_mag - start_mag).abs();

    if end_mag > start_mag {
        // Vertex at start: spandrel area d*l^3/(3L^2), centroid 3/4 l from start
        combine(
            &[
                Strip::new(start_mag * loaded, start + loaded / 2.0),
                Strip::new(d * loaded.powi(3) / (3.0 * span * span), start + 0.75 * loaded),
            ],
            x,
        )
    } else {
        // Vertex at end: the full spandrel minus the part not yet reached
        let remaining = span - loaded;
        combine(
            &[
                Strip::new(end_mag * loaded, start + loaded / 2.0),
                Strip::new(d * span / 3.0, start + span / 4.0),
                Strip::new(
                    -d * remaining.powi(3) / (3.0 * span * span),
                    end - 0.75 * remaining,
                ),
            ],
            x,
        )
    }
}
