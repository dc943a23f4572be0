//! Geometric predicates with error-bounded tolerance.

use crate::primitives::Point2;
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

impl Orientation {
    /// Returns true for [`Orientation::CounterClockwise`].
    #[inline]
    pub fn is_ccw(self) -> bool {
        self == Orientation::CounterClockwise
    }

    /// Returns true for [`Orientation::Clockwise`].
    #[inline]
    pub fn is_cw(self) -> bool {
        self == Orientation::Clockwise
    }
}

/// Computes the orientation of three points, scaling the tolerance to the input.
///
/// The determinant is compared against a bound on its own rounding error, so
/// the answer is `Collinear` only when floating point cannot tell the sides
/// apart. This is the predicate the triangulation uses for every topological
/// decision.
///
/// # Example
///
/// ```
/// use relaxum::tolerance::{orientation, Orientation};
/// use relaxum::Point2;
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(1.0, 0.0);
///
/// assert_eq!(orientation(a, b, Point2::new(0.5, 1.0)), Orientation::CounterClockwise);
/// assert_eq!(orientation(a, b, Point2::new(2.0, 0.0)), Orientation::Collinear);
/// ```
#[inline]
pub fn orientation<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Orientation {
    let left = (b.x - a.x) * (c.y - a.y);
    let right = (b.y - a.y) * (c.x - a.x);
    let det = left - right;
    let bound = F::from(2.0).unwrap() * F::epsilon() * (left.abs() + right.abs());

    if det > bound {
        Orientation::CounterClockwise
    } else if det < -bound {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns the in-circle determinant and its rounding-error bound.
///
/// The determinant is positive when `d` lies inside the circle through the
/// counter-clockwise triangle `abc`.
#[inline]
pub fn incircle_det<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, d: Point2<F>) -> (F, F) {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;
    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);
    let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
        + (cdxady.abs() + adxcdy.abs()) * blift
        + (adxbdy.abs() + bdxady.abs()) * clift;

    (det, F::from(8.0).unwrap() * F::epsilon() * permanent)
}

/// Tests if `d` lies strictly inside the circumcircle of the CCW triangle `abc`.
///
/// Points on the circle, or too close to it to decide, are reported as outside,
/// which keeps edge flipping from cycling on co-circular input.
///
/// # Example
///
/// ```
/// use relaxum::tolerance::in_circumcircle;
/// use relaxum::Point2;
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(1.0, 0.0);
/// let c = Point2::new(0.0, 1.0);
///
/// assert!(in_circumcircle(a, b, c, Point2::new(0.6, 0.6)));
/// assert!(!in_circumcircle(a, b, c, Point2::new(1.0, 1.0))); // co-circular
/// assert!(!in_circumcircle(a, b, c, Point2::new(3.0, 3.0)));
/// ```
#[inline]
pub fn in_circumcircle<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, d: Point2<F>) -> bool {
    let (det, bound) = incircle_det(a, b, c, d);
    det > bound
}

/// Computes the circumcenter of a triangle.
///
/// Returns `None` when the vertices are collinear and the circumcenter is at
/// infinity.
pub fn circumcenter<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Option<Point2<F>> {
    if orientation(a, b, c) == Orientation::Collinear {
        return None;
    }

    // Relative to `a` to keep the magnitudes small.
    let bx = b.x - a.x;
    let by = b.y - a.y;
    let cx = c.x - a.x;
    let cy = c.y - a.y;

    let d = F::from(2.0).unwrap() * (bx * cy - by * cx);
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;

    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;

    let center = Point2::new(a.x + ux, a.y + uy);
    if center.is_finite() {
        Some(center)
    } else {
        None
    }
}

/// Tests whether closed segments `p1p2` and `q1q2` share at least one point.
///
/// Touching at an endpoint and collinear overlap both count.
pub fn segments_touch<F: Float>(
    p1: Point2<F>,
    p2: Point2<F>,
    q1: Point2<F>,
    q2: Point2<F>,
) -> bool {
    use Orientation::Collinear;

    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    // One segment entirely on one side of the other's line.
    if o1 != Collinear && o1 == o2 {
        return false;
    }
    if o3 != Collinear && o3 == o4 {
        return false;
    }

    if o1 != Collinear && o2 != Collinear && o3 != Collinear && o4 != Collinear {
        return true;
    }

    (o1 == Collinear && within_box(q1, p1, p2))
        || (o2 == Collinear && within_box(q2, p1, p2))
        || (o3 == Collinear && within_box(p1, q1, q2))
        || (o4 == Collinear && within_box(p2, q1, q2))
}

#[inline]
fn within_box<F: Float>(p: Point2<F>, s: Point2<F>, e: Point2<F>) -> bool {
    p.x >= s.x.min(e.x) && p.x <= s.x.max(e.x) && p.y >= s.y.min(e.y) && p.y <= s.y.max(e.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation_resolves_nearly_collinear() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert_eq!(orientation(a, b, Point2::new(0.5, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(a, b, Point2::new(0.5, 1e-12)), Orientation::CounterClockwise);
        assert_eq!(orientation(a, b, Point2::new(0.5, -1e-12)), Orientation::Clockwise);
    }

    #[test]
    fn test_orientation_cw_and_collinear() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 2.0);
        assert_eq!(orientation(a, b, Point2::new(2.0, 0.0)), Orientation::Clockwise);
        assert_eq!(orientation(a, b, Point2::new(1.0, 1.0)), Orientation::Collinear);
        assert_eq!(orientation(a, b, Point2::new(-3.0, -3.0)), Orientation::Collinear);
    }

    #[test]
    fn test_orientation_scale_invariant() {
        let s = 1e6_f64;
        let a = Point2::new(0.1 * s, 0.1 * s);
        let b = Point2::new(0.7 * s, 0.3 * s);
        let c = Point2::new(0.2 * s, 0.9 * s);
        assert!(orientation(a, b, c).is_ccw());
        assert!(orientation(a, c, b).is_cw());
    }

    #[test]
    fn test_in_circumcircle_inside_outside() {
        let a = Point2::new(0.0_f64, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.5, 0.866);

        assert!(in_circumcircle(a, b, c, Point2::new(0.5, 0.288)));
        assert!(!in_circumcircle(a, b, c, Point2::new(10.0, 10.0)));
    }

    #[test]
    fn test_in_circumcircle_cocircular_is_outside() {
        // Corners of a square are co-circular.
        let a = Point2::new(0.0_f64, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(1.0, 1.0);
        assert!(!in_circumcircle(a, b, c, Point2::new(0.0, 1.0)));
    }

    #[test]
    fn test_circumcenter_right_triangle() {
        let a = Point2::new(0.0_f64, 0.0);
        let b = Point2::new(2.0, 0.0);
        let c = Point2::new(0.0, 2.0);
        let cc = circumcenter(a, b, c).unwrap();
        assert_relative_eq!(cc.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cc.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_equidistant() {
        let a = Point2::new(0.3_f64, 0.1);
        let b = Point2::new(1.7, 0.4);
        let c = Point2::new(0.9, 1.3);
        let cc = circumcenter(a, b, c).unwrap();
        let ra = cc.distance(a);
        assert_relative_eq!(cc.distance(b), ra, epsilon = 1e-12);
        assert_relative_eq!(cc.distance(c), ra, epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_collinear() {
        let a = Point2::new(0.0_f64, 0.0);
        let b = Point2::new(1.0, 1.0);
        let c = Point2::new(2.0, 2.0);
        assert!(circumcenter(a, b, c).is_none());
    }

    #[test]
    fn test_segments_touch_crossing() {
        let p1 = Point2::new(0.0_f64, 0.0);
        let p2 = Point2::new(2.0, 2.0);
        let q1 = Point2::new(0.0, 2.0);
        let q2 = Point2::new(2.0, 0.0);
        assert!(segments_touch(p1, p2, q1, q2));
    }

    #[test]
    fn test_segments_touch_disjoint() {
        let p1 = Point2::new(0.0_f64, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        let q1 = Point2::new(0.0, 1.0);
        let q2 = Point2::new(1.0, 1.0);
        assert!(!segments_touch(p1, p2, q1, q2));

        // Would cross if extended.
        let r1 = Point2::new(2.0, -1.0);
        let r2 = Point2::new(2.0, 1.0);
        assert!(!segments_touch(p1, p2, r1, r2));
    }

    #[test]
    fn test_segments_touch_endpoint() {
        let p1 = Point2::new(0.0_f64, 0.0);
        let p2 = Point2::new(1.0, 0.0);
        let q1 = Point2::new(1.0, 0.0);
        let q2 = Point2::new(1.0, 1.0);
        assert!(segments_touch(p1, p2, q1, q2));

        // T-junction: endpoint of q on the interior of p.
        let t1 = Point2::new(0.5, 0.0);
        let t2 = Point2::new(0.5, 3.0);
        assert!(segments_touch(p1, p2, t1, t2));
    }

    #[test]
    fn test_segments_touch_collinear() {
        let p1 = Point2::new(0.0_f64, 0.0);
        let p2 = Point2::new(2.0, 0.0);
        assert!(segments_touch(p1, p2, Point2::new(1.0, 0.0), Point2::new(3.0, 0.0)));
        assert!(!segments_touch(p1, p2, Point2::new(3.0, 0.0), Point2::new(4.0, 0.0)));
    }
}
