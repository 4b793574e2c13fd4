//! Separating-axis classification of two world-space solids.

use clash_types::Classification;
use nalgebra::Vector3;

use crate::{KernelConfig, WorldSolid};

/// Detailed result of [`separating_axis_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatOutcome {
    /// Final classification.
    pub classification: Classification,
    /// Signed overlap along `axis`: negative is a gap, positive a penetration.
    pub depth: f64,
    /// The deciding axis (separating axis, or axis of least overlap).
    pub axis: Vector3<f64>,
    /// Absolute tolerance the depth was compared against.
    pub tolerance: f64,
}

/// Classify two world-space solids with the separating-axis test.
///
/// Axes are tested in order: face normals of `a`, face normals of `b`, then
/// cross products of every edge direction pair. The first axis that separates
/// the projections by more than the tolerance ends the test as
/// [`Classification::Disjoint`].
#[must_use]
pub fn separating_axis_test(a: &WorldSolid, b: &WorldSolid, config: &KernelConfig) -> SatOutcome {
    let scale = a.bounds().union(b.bounds()).max_extent().max(1.0);
    let tolerance = config.contact_tolerance * scale;

    let edge_axes = a.edge_directions().iter().flat_map(|ea| {
        b.edge_directions()
            .iter()
            .filter_map(move |eb| ea.cross(eb).try_normalize(config.axis_epsilon))
    });

    let axes = a
        .face_normals()
        .iter()
        .chain(b.face_normals())
        .copied()
        .chain(edge_axes);

    let mut least = SatOutcome {
        classification: Classification::Intersect,
        depth: f64::INFINITY,
        axis: Vector3::zeros(),
        tolerance,
    };

    for axis in axes {
        let (a_min, a_max) = a.project(&axis);
        let (b_min, b_max) = b.project(&axis);
        let depth = a_max.min(b_max) - a_min.max(b_min);

        if depth < -tolerance {
            return SatOutcome {
                classification: Classification::Disjoint,
                depth,
                axis,
                tolerance,
            };
        }

        if depth < least.depth {
            least.depth = depth;
            least.axis = axis;
        }
    }

    least.classification = if least.depth > tolerance {
        Classification::Intersect
    } else {
        Classification::Touching
    };
    least
}
