//! Constrained Delaunay triangulation with movable vertices.
//!
//! [`Triangulation`] owns a planar constrained Delaunay triangulation (CDT):
//! vertices, triangles with neighbour links, and a set of constraint edges that
//! are never flipped. Unlike a one-shot triangulator it stays valid while
//! unconstrained vertices are moved, which is what Lloyd relaxation needs.
//!
//! # Algorithm
//!
//! - Points are inserted incrementally: a remembering stochastic walk locates
//!   the containing triangle (or edge), which is split 1→3 (or 2→4), and
//!   Lawson flips restore the Delaunay property.
//! - A constraint edge removes the triangles it crosses, re-triangulates the
//!   two pockets on either side and re-legalizes.
//! - Relocation moves a vertex in place when its star stays valid, otherwise
//!   removes it and re-inserts it under the same handle.
//!
//! The store is seeded with a large enclosing triangle. Its three corner
//! vertices are internal: they never appear in [`Triangulation::vertices`],
//! [`Triangulation::triangles`] or the domain.
//!
//! # Example
//!
//! ```
//! use relaxum::triangulation::Triangulation;
//! use relaxum::Point2;
//!
//! let points = [
//!     Point2::new(0.0_f64, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(0.3, 0.6),
//! ];
//! let (mut tri, ids) = Triangulation::from_points(&points)?;
//! for i in 0..4 {
//!     tri.insert_constraint(ids[i], ids[(i + 1) % 4])?;
//! }
//! tri.mark_domain(&[])?;
//!
//! assert_eq!(tri.num_vertices(), 5);
//! assert_eq!(tri.num_triangles(), 4);
//! assert!(tri.is_constrained(ids[0]));
//! assert!(!tri.is_constrained(ids[4]));
//! tri.validate()?;
//! # Ok::<(), relaxum::RelaxError>(())
//! ```

mod cdt;
mod domain;
mod locate;
mod voronoi;

pub use voronoi::{voronoi_cell, VoronoiCell};

use crate::error::{RelaxError, Result};
use crate::primitives::Point2;
use crate::tolerance::circumcenter as circumcenter_of;
use num_traits::Float;
use std::collections::BTreeSet;

/// Missing neighbour (edge on the enclosing triangle) or missing hint.
const NONE: usize = usize::MAX;

/// The enclosing triangle's corners occupy the first arena slots.
const GHOSTS: usize = 3;

/// Stable handle to a vertex.
///
/// Handles stay valid for the lifetime of the triangulation, including across
/// relocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

impl VertexId {
    /// Returns the arena index behind this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a triangle.
///
/// Triangle slots are reused, so a handle is only meaningful until the next
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(usize);

impl TriangleId {
    /// Returns the arena index behind this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome of [`Triangulation::relocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// The vertex now sits at the target.
    Moved,
    /// The target equals the current position.
    Unchanged,
    /// The target was refused; the vertex kept its position.
    Rejected,
}

#[derive(Debug, Clone)]
struct Vertex<F> {
    point: Point2<F>,
    /// Some live triangle incident to this vertex.
    hint: usize,
    /// Number of incident constraint edges.
    constraint_degree: u32,
}

/// Triangle record. Neighbour `i` lies across the edge opposite `v[i]`,
/// which is the directed edge `(v[i + 1], v[i + 2])`.
#[derive(Debug, Clone, Copy)]
struct Face {
    v: [usize; 3],
    n: [usize; 3],
    c: [bool; 3],
    in_domain: bool,
    alive: bool,
}

/// A constrained Delaunay triangulation whose free vertices can be moved.
#[derive(Debug, Clone)]
pub struct Triangulation<F> {
    vertices: Vec<Vertex<F>>,
    faces: Vec<Face>,
    free: Vec<usize>,
    live: usize,
    constraints: BTreeSet<(usize, usize)>,
    /// Seeds of the last domain marking, if any.
    seeds: Option<Vec<Point2<F>>>,
    walk_start: usize,
}

#[inline]
fn next(i: usize) -> usize {
    (i + 1) % 3
}

#[inline]
fn prev(i: usize) -> usize {
    (i + 2) % 3
}

#[inline]
fn is_ghost(v: usize) -> bool {
    v < GHOSTS
}

#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
fn slot(face: &Face, v: usize) -> Option<usize> {
    face.v.iter().position(|&x| x == v)
}

impl<F: Float> Triangulation<F> {
    /// Creates an empty triangulation that accepts points within `min..=max`.
    ///
    /// Points somewhat outside the box are still accepted; points outside the
    /// internal enclosing triangle are rejected with
    /// [`RelaxError::OutOfBounds`].
    pub fn with_bounds(min: Point2<F>, max: Point2<F>) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(RelaxError::NonFinitePoint);
        }

        let two = F::from(2.0).unwrap();
        let center = min.midpoint(max);
        let half = (max - min).magnitude() / two;
        let radius = if half > F::zero() { half } else { F::one() };

        // Equilateral triangle whose inscribed circle has radius `r`.
        let r = radius * F::from(100.0).unwrap();
        let sqrt3 = F::from(3.0).unwrap().sqrt();
        let corners = [
            Point2::new(center.x - sqrt3 * r, center.y - r),
            Point2::new(center.x + sqrt3 * r, center.y - r),
            Point2::new(center.x, center.y + two * r),
        ];
        if corners.iter().any(|p| !p.is_finite()) {
            return Err(RelaxError::OutOfBounds);
        }

        let vertices = corners
            .iter()
            .map(|&point| Vertex {
                point,
                hint: 0,
                constraint_degree: 0,
            })
            .collect();

        Ok(Self {
            vertices,
            faces: vec![Face {
                v: [0, 1, 2],
                n: [NONE; 3],
                c: [false; 3],
                in_domain: true,
                alive: true,
            }],
            free: Vec::new(),
            live: 1,
            constraints: BTreeSet::new(),
            seeds: None,
            walk_start: 0,
        })
    }

    /// Triangulates a point set.
    ///
    /// Returns the triangulation and one handle per input point. Duplicate
    /// points share a handle.
    pub fn from_points(points: &[Point2<F>]) -> Result<(Self, Vec<VertexId>)> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(RelaxError::NonFinitePoint);
        }

        let (min, max) = match points.first() {
            Some(&first) => points.iter().fold((first, first), |(lo, hi), p| {
                (
                    Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            }),
            None => (Point2::origin(), Point2::new(F::one(), F::one())),
        };

        let mut tri = Self::with_bounds(min, max)?;
        let ids = points
            .iter()
            .map(|&p| tri.insert(p))
            .collect::<Result<Vec<_>>>()?;
        Ok((tri, ids))
    }

    /// Position of a vertex.
    ///
    /// # Panics
    ///
    /// Panics if `v` was issued by a different triangulation and is out of range.
    #[inline]
    pub fn point(&self, v: VertexId) -> Point2<F> {
        self.vertices[v.0].point
    }

    /// Returns true if `v` is an endpoint of at least one constraint edge.
    #[inline]
    pub fn is_constrained(&self, v: VertexId) -> bool {
        self.vertices
            .get(v.0)
            .is_some_and(|vertex| vertex.constraint_degree > 0)
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (GHOSTS..self.vertices.len()).map(VertexId)
    }

    /// Unconstrained vertices in ascending handle order.
    pub fn movable_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices().filter(move |&v| !self.is_constrained(v))
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() - GHOSTS
    }

    /// All triangles whose corners are real vertices, holes included.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.alive && !face.v.iter().any(|&v| is_ghost(v)))
            .map(|(t, _)| TriangleId(t))
    }

    /// Number of triangles returned by [`Triangulation::triangles`].
    pub fn num_triangles(&self) -> usize {
        self.triangles().count()
    }

    /// Corners of a triangle in counter-clockwise order.
    #[inline]
    pub fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3] {
        self.faces[t.0].v.map(VertexId)
    }

    /// Circumcenter of a triangle, `None` if it is degenerate.
    pub fn circumcenter(&self, t: TriangleId) -> Option<Point2<F>> {
        let [a, b, c] = self.faces[t.0].v.map(|v| self.vertices[v].point);
        circumcenter_of(a, b, c)
    }

    /// Returns true if the triangle belongs to the meshed domain.
    ///
    /// Before [`Triangulation::mark_domain`] runs, every finite triangle is in
    /// the domain.
    #[inline]
    pub fn is_in_domain(&self, t: TriangleId) -> bool {
        self.face_in_domain(t.0)
    }

    /// Constraint edges as vertex pairs, smaller handle first.
    pub fn constraints(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.constraints
            .iter()
            .map(|&(a, b)| (VertexId(a), VertexId(b)))
    }

    /// Returns true if `ab` is a constraint edge (in either direction).
    #[inline]
    pub fn is_constraint_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.constraints.contains(&edge_key(a.0, b.0))
    }

    /// Finite triangles around `v` in counter-clockwise order.
    pub fn incident_triangles(&self, v: VertexId) -> Vec<TriangleId> {
        self.fan(v.0)
            .into_iter()
            .filter(|&t| !self.faces[t].v.iter().any(|&x| is_ghost(x)))
            .map(TriangleId)
            .collect()
    }

    /// Neighbours of `v` with edge lengths, in counter-clockwise order.
    pub fn incident_edges(&self, v: VertexId) -> Vec<(VertexId, F)> {
        let origin = self.vertices[v.0].point;
        self.fan(v.0)
            .into_iter()
            .filter_map(|t| {
                let face = &self.faces[t];
                let k = slot(face, v.0)?;
                let w = face.v[next(k)];
                if is_ghost(w) {
                    None
                } else {
                    Some((VertexId(w), origin.distance(self.vertices[w].point)))
                }
            })
            .collect()
    }

    /// Length of the shortest edge at `v`, `None` for an isolated vertex.
    pub fn shortest_incident_edge(&self, v: VertexId) -> Option<F> {
        self.incident_edges(v)
            .into_iter()
            .map(|(_, length)| length)
            .reduce(F::min)
    }

    fn face_in_domain(&self, t: usize) -> bool {
        let face = &self.faces[t];
        face.alive && face.in_domain && !face.v.iter().any(|&v| is_ghost(v))
    }

    fn check_vertex(&self, v: VertexId) -> Result<usize> {
        if is_ghost(v.0) || v.0 >= self.vertices.len() {
            Err(RelaxError::UnknownVertex { vertex: v.0 })
        } else {
            Ok(v.0)
        }
    }

    /// Live triangles around `v` in counter-clockwise order.
    ///
    /// The fan of a real vertex is closed. Corners of the enclosing triangle
    /// have open fans, which are returned from the clockwise-most triangle.
    fn fan(&self, v: usize) -> Vec<usize> {
        let start = match self.vertices.get(v) {
            Some(vertex) if vertex.hint != NONE => vertex.hint,
            _ => return Vec::new(),
        };
        let cap = self.faces.len();

        // Rewind clockwise to the open end, if there is one.
        let mut first = start;
        for _ in 0..cap {
            let face = &self.faces[first];
            let Some(k) = slot(face, v) else {
                return Vec::new();
            };
            let cw = face.n[prev(k)];
            if cw == NONE {
                break;
            }
            if cw == start {
                first = start;
                break;
            }
            first = cw;
        }

        let mut fan = Vec::new();
        let mut t = first;
        for _ in 0..cap {
            fan.push(t);
            let face = &self.faces[t];
            let Some(k) = slot(face, v) else {
                break;
            };
            let ccw = face.n[next(k)];
            if ccw == NONE || ccw == first {
                break;
            }
            t = ccw;
        }
        fan
    }

    /// Slot `i` of triangle `t` whose directed edge is `(u, w)`.
    fn edge_slot(&self, t: usize, u: usize, w: usize) -> Option<usize> {
        let face = &self.faces[t];
        (0..3).find(|&i| face.v[next(i)] == u && face.v[prev(i)] == w)
    }

    /// Some triangle holding edge `ab`, with the slot opposite it.
    fn find_edge(&self, a: usize, b: usize) -> Option<(usize, usize)> {
        self.fan(a).into_iter().find_map(|t| {
            self.edge_slot(t, a, b)
                .or_else(|| self.edge_slot(t, b, a))
                .map(|i| (t, i))
        })
    }
}
