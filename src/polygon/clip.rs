//! Half-plane clipping.

use crate::primitives::Point2;
use num_traits::Float;

/// Clips a polygon to the closed half-plane left of the directed line `a → b`.
///
/// This is one Sutherland-Hodgman stage. Clipping a convex polygon yields a
/// convex polygon; the result may be empty if the polygon lies entirely on the
/// right of the line.
///
/// # Example
///
/// ```
/// use relaxum::polygon::clip_half_plane;
/// use relaxum::Point2;
///
/// let square = vec![
///     Point2::new(0.0_f64, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
///
/// // Keep everything left of the upward line x = 1.
/// let left = clip_half_plane(&square, Point2::new(1.0, 0.0), Point2::new(1.0, 1.0));
/// assert_eq!(left.len(), 4);
/// assert!(left.iter().all(|p| p.x <= 1.0));
/// ```
pub fn clip_half_plane<F: Float>(
    vertices: &[Point2<F>],
    a: Point2<F>,
    b: Point2<F>,
) -> Vec<Point2<F>> {
    let n = vertices.len();
    let mut output = Vec::with_capacity(n + 1);

    for i in 0..n {
        let current = vertices[i];
        let next = vertices[(i + 1) % n];

        let current_side = side(current, a, b);
        let next_side = side(next, a, b);

        if current_side >= F::zero() {
            output.push(current);
            if next_side < F::zero() {
                // Exiting
                output.push(crossing(current, next, current_side, next_side));
            }
        } else if next_side >= F::zero() {
            // Entering
            output.push(crossing(current, next, current_side, next_side));
        }
    }

    output
}

/// Signed distance-like value: positive on the left of `a → b`.
#[inline]
fn side<F: Float>(p: Point2<F>, a: Point2<F>, b: Point2<F>) -> F {
    (b - a).cross(p - a)
}

/// Point where segment `pq` meets the line, given the side values at `p` and `q`.
///
/// The side values have opposite signs, so the denominator never vanishes.
#[inline]
fn crossing<F: Float>(p: Point2<F>, q: Point2<F>, sp: F, sq: F) -> Point2<F> {
    let t = sp / (sp - sq);
    p + (q - p) * t
}
