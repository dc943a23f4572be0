//! Restricted Voronoi cells of free vertices.
//!
//! The Voronoi diagram is the dual of the Delaunay triangulation: the cell of
//! a vertex is the polygon through the circumcenters of its incident
//! triangles, taken in counter-clockwise order. In a constrained triangulation
//! a circumcenter can fall on the far side of a constraint, so the polygon is
//! clipped against every constraint edge that hides part of it from the
//! vertex.
//!
//! # Example
//!
//! ```
//! use relaxum::triangulation::{voronoi_cell, Triangulation};
//! use relaxum::Point2;
//!
//! let points = [
//!     Point2::new(0.0_f64, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(0.5, 0.5),
//! ];
//! let (mut tri, ids) = Triangulation::from_points(&points)?;
//! for i in 0..4 {
//!     tri.insert_constraint(ids[i], ids[(i + 1) % 4])?;
//! }
//! tri.mark_domain(&[])?;
//!
//! // Boundary vertices are constrained and have no cell.
//! assert!(voronoi_cell(&tri, ids[0])?.is_none());
//!
//! let cell = voronoi_cell(&tri, ids[4])?.unwrap();
//! assert_eq!(cell.vertices.len(), 4);
//! let c = cell.centroid().unwrap();
//! assert!((c.x - 0.5).abs() < 1e-12 && (c.y - 0.5).abs() < 1e-12);
//! # Ok::<(), relaxum::RelaxError>(())
//! ```

use super::{Triangulation, VertexId};
use crate::error::{RelaxError, Result};
use crate::polygon::{clip_half_plane, polygon_centroid};
use crate::primitives::Point2;
use crate::tolerance::{circumcenter, orientation, segments_touch, Orientation};
use num_traits::Float;

/// The Voronoi cell of one vertex, restricted to the vertex's side of the
/// surrounding constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell<F> {
    /// The vertex generating the cell.
    pub site: VertexId,
    /// Cell corners in counter-clockwise order.
    pub vertices: Vec<Point2<F>>,
}

impl<F: Float> VoronoiCell<F> {
    /// Area centroid of the cell, `None` if the cell has no area.
    pub fn centroid(&self) -> Option<Point2<F>> {
        polygon_centroid(&self.vertices)
    }
}

/// Computes the Voronoi cell of `v`.
///
/// Returns `Ok(None)` when `v` does not take part in relaxation: it is
/// constrained, or one of its incident triangles is outside the domain.
///
/// A circumcenter hidden from `v` behind a constraint edge is cut back to the
/// line through that edge. This repeats until every corner of the cell is
/// visible from `v`.
///
/// # Errors
///
/// [`RelaxError::DegenerateGeometry`] when the fan around `v` has fewer than
/// three triangles, a triangle is too flat to have a circumcenter, or
/// clipping leaves no area.
pub fn voronoi_cell<F: Float>(
    tri: &Triangulation<F>,
    v: VertexId,
) -> Result<Option<VoronoiCell<F>>> {
    let id = tri.check_vertex(v)?;
    if tri.is_constrained(v) {
        return Ok(None);
    }

    let fan = tri.fan(id);
    if fan.iter().any(|&t| !tri.face_in_domain(t)) {
        return Ok(None);
    }
    let degenerate = || RelaxError::DegenerateGeometry { vertex: id };
    if fan.len() < 3 {
        return Err(degenerate());
    }

    let mut vertices = Vec::with_capacity(fan.len());
    for &t in &fan {
        let [a, b, c] = tri.faces[t].v.map(|x| tri.vertices[x].point);
        vertices.push(circumcenter(a, b, c).ok_or_else(degenerate)?);
    }

    let site = tri.vertices[id].point;
    let mut used: Vec<(usize, usize)> = Vec::new();
    loop {
        let mut walls = Vec::new();
        for &(a, b) in &tri.constraints {
            if used.contains(&(a, b)) {
                continue;
            }
            let Some(wall) = facing(site, tri.vertices[a].point, tri.vertices[b].point) else {
                continue;
            };
            if hides_corner(site, &vertices, wall) {
                used.push((a, b));
                walls.push(wall);
            }
        }
        if walls.is_empty() {
            break;
        }

        for (u, w) in walls {
            vertices = clip_half_plane(&vertices, u, w);
            if vertices.len() < 3 {
                return Err(degenerate());
            }
        }
    }

    Ok(Some(VoronoiCell { site: v, vertices }))
}

/// Orients the segment `ab` so that `site` is on its left. `None` if `site`
/// is on the segment's line.
fn facing<F: Float>(
    site: Point2<F>,
    a: Point2<F>,
    b: Point2<F>,
) -> Option<(Point2<F>, Point2<F>)> {
    match orientation(a, b, site) {
        Orientation::CounterClockwise => Some((a, b)),
        Orientation::Clockwise => Some((b, a)),
        Orientation::Collinear => None,
    }
}

/// True if some corner lies strictly behind `wall` as seen from `site`.
fn hides_corner<F: Float>(
    site: Point2<F>,
    corners: &[Point2<F>],
    (u, w): (Point2<F>, Point2<F>),
) -> bool {
    corners
        .iter()
        .any(|&p| orientation(u, w, p).is_cw() && segments_touch(site, p, u, w))
}
