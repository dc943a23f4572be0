//! Shoelace area and area centroid.

use crate::primitives::Point2;
use num_traits::Float;

/// Computes the signed area of a polygon using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }

    let mut area = F::zero();
    let n = vertices.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area = area + vertices[i].x * vertices[j].y;
        area = area - vertices[j].x * vertices[i].y;
    }

    area / F::from(2.0).unwrap()
}

/// Computes the area centroid of a polygon.
///
/// This is the center of mass of the enclosed region, not the average of the
/// vertices; the two differ for any irregular polygon. Coordinates are taken
/// relative to the first vertex so that cells far from the origin keep their
/// precision.
///
/// Returns `None` for degenerate polygons (fewer than 3 vertices or zero area).
///
/// # Example
///
/// ```
/// use relaxum::polygon::polygon_centroid;
/// use relaxum::Point2;
///
/// // The vertex average would be (1.25, 0.5).
/// let trapezoid = vec![
///     Point2::new(0.0_f64, 0.0),
///     Point2::new(3.0, 0.0),
///     Point2::new(2.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let c = polygon_centroid(&trapezoid).unwrap();
/// assert!((c.x - 1.26666667).abs() < 1e-6);
/// assert!((c.y - 0.46666667).abs() < 1e-6);
/// ```
pub fn polygon_centroid<F: Float>(vertices: &[Point2<F>]) -> Option<Point2<F>> {
    if vertices.len() < 3 {
        return None;
    }

    let origin = vertices[0];
    let mut twice_area = F::zero();
    let mut cx = F::zero();
    let mut cy = F::zero();
    let n = vertices.len();

    for i in 0..n {
        let p = vertices[i] - origin;
        let q = vertices[(i + 1) % n] - origin;
        let cross = p.cross(q);
        twice_area = twice_area + cross;
        cx = cx + (p.x + q.x) * cross;
        cy = cy + (p.y + q.y) * cross;
    }

    if twice_area.abs() <= F::epsilon() * scale_squared(vertices) {
        return None;
    }

    let three = F::from(3.0).unwrap();
    let centroid = Point2::new(
        origin.x + cx / (three * twice_area),
        origin.y + cy / (three * twice_area),
    );

    if centroid.is_finite() {
        Some(centroid)
    } else {
        None
    }
}

/// Squared extent of the bounding box, used to make area tests scale-free.
fn scale_squared<F: Float>(vertices: &[Point2<F>]) -> F {
    let mut min = vertices[0];
    let mut max = vertices[0];

    for v in &vertices[1..] {
        min.x = min.x.min(v.x);
        min.y = min.y.min(v.y);
        max.x = max.x.max(v.x);
        max.y = max.y.max(v.y);
    }

    (max - min).magnitude_squared()
}
