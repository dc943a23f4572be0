//! Move vectors and their size relative to the local mesh scale.

use crate::primitives::{Point2, Vec2};
use crate::triangulation::{Triangulation, VertexId};
use num_traits::Float;

/// The vector moving `position` onto `target`.
#[inline]
pub fn displacement<F: Float>(position: Point2<F>, target: Point2<F>) -> Vec2<F> {
    target - position
}

/// Length of `d` relative to the shortest edge incident to `v`.
///
/// Returns zero when `v` has no incident edge or its shortest edge has zero
/// length, so such vertices never hold up convergence.
///
/// # Example
///
/// ```
/// use relaxum::lloyd::displacement_ratio;
/// use relaxum::triangulation::Triangulation;
/// use relaxum::{Point2, Vec2};
///
/// let points = [
///     Point2::new(0.0_f64, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(0.0, 2.0),
/// ];
/// let (tri, ids) = Triangulation::from_points(&points)?;
///
/// let ratio = displacement_ratio(&tri, ids[0], Vec2::new(0.5, 0.0));
/// assert!((ratio - 0.25).abs() < 1e-12);
/// # Ok::<(), relaxum::RelaxError>(())
/// ```
pub fn displacement_ratio<F: Float>(tri: &Triangulation<F>, v: VertexId, d: Vec2<F>) -> F {
    match tri.shortest_incident_edge(v) {
        Some(shortest) if shortest > F::zero() => d.magnitude() / shortest,
        _ => F::zero(),
    }
}
