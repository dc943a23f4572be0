//! Mutation of the constrained Delaunay triangulation.
//!
//! Every topological change goes through [`Triangulation::retriangulate`],
//! which replaces a connected set of triangles by another triangulation of the
//! same region and rebuilds the adjacency. Flips, splits, constraint
//! insertion and vertex removal only decide *which* triangles to produce.

use super::locate::Location;
use super::{
    edge_key, is_ghost, next, prev, slot, Face, Relocation, Triangulation, Vertex, VertexId, NONE,
};
use crate::error::{RelaxError, Result};
use crate::primitives::Point2;
use crate::tolerance::{in_circumcircle, orientation, segments_touch, Orientation};
use num_traits::Float;
use std::collections::HashMap;
use tracing::{trace, warn};

impl<F: Float> Triangulation<F> {
    /// Inserts a point and returns its handle.
    ///
    /// A point equal to an existing vertex returns that vertex. A point that
    /// lands exactly on a constraint edge splits it into two constraints.
    ///
    /// # Errors
    ///
    /// [`RelaxError::NonFinitePoint`] for NaN or infinite coordinates and
    /// [`RelaxError::OutOfBounds`] for points outside the enclosing triangle.
    pub fn insert(&mut self, point: Point2<F>) -> Result<VertexId> {
        if !point.is_finite() {
            return Err(RelaxError::NonFinitePoint);
        }

        let location = self.locate(point);
        match location {
            Location::OnVertex(v) if !is_ghost(v) => return Ok(VertexId(v)),
            Location::OnVertex(_) | Location::Outside => return Err(RelaxError::OutOfBounds),
            Location::OnEdge(t, i) if self.faces[t].n[i] == NONE => {
                return Err(RelaxError::OutOfBounds)
            }
            _ => {}
        }

        let v = self.vertices.len();
        self.vertices.push(Vertex {
            point,
            hint: NONE,
            constraint_degree: 0,
        });
        self.insert_at(v, location);
        Ok(VertexId(v))
    }

    /// Forces `ab` to be an edge of the triangulation.
    ///
    /// Vertices lying exactly on the segment split it into a chain of
    /// constraints. If the domain has been marked, marking is re-run with the
    /// same seeds.
    ///
    /// # Errors
    ///
    /// - [`RelaxError::UnknownVertex`] for a handle that names no vertex.
    /// - [`RelaxError::DegenerateConstraint`] when `a == b`.
    /// - [`RelaxError::ConstraintIntersection`] when the segment crosses an
    ///   existing constraint.
    pub fn insert_constraint(&mut self, a: VertexId, b: VertexId) -> Result<()> {
        let a = self.check_vertex(a)?;
        let b = self.check_vertex(b)?;
        if a == b {
            return Err(RelaxError::DegenerateConstraint { vertex: a });
        }

        self.force_edge(a, b)?;

        if let Some(seeds) = self.seeds.clone() {
            self.mark_domain(&seeds)?;
        }
        Ok(())
    }

    /// Moves an unconstrained vertex to `target`, keeping the triangulation a
    /// valid CDT.
    ///
    /// The vertex is moved in place when its star stays valid. Otherwise it is
    /// removed and re-inserted at `target` under the same handle.
    ///
    /// Targets are refused ([`Relocation::Rejected`]) when they are not
    /// finite, lie outside the domain, coincide with another vertex, lie on a
    /// constraint, or when the straight path from the current position
    /// touches a constraint edge. A vertex with a triangle outside the domain
    /// in its star is never moved: re-triangulating its star would change
    /// which triangles are marked.
    ///
    /// # Errors
    ///
    /// [`RelaxError::ConstrainedVertex`] if `v` is constrained and
    /// [`RelaxError::UnknownVertex`] if `v` names no vertex.
    pub fn relocate(&mut self, v: VertexId, target: Point2<F>) -> Result<Relocation> {
        let id = self.check_vertex(v)?;
        if self.vertices[id].constraint_degree > 0 {
            return Err(RelaxError::ConstrainedVertex { vertex: id });
        }

        let from = self.vertices[id].point;
        if target == from {
            return Ok(Relocation::Unchanged);
        }
        if !target.is_finite() {
            trace!(vertex = id, "relocation rejected: non-finite target");
            return Ok(Relocation::Rejected);
        }
        if self.path_touches_constraint(from, target) {
            trace!(vertex = id, "relocation rejected: path touches a constraint");
            return Ok(Relocation::Rejected);
        }
        let fan = self.fan(id);
        if !fan.iter().all(|&t| self.face_in_domain(t)) {
            trace!(vertex = id, "relocation rejected: star leaves the domain");
            return Ok(Relocation::Rejected);
        }

        match self.locate(target) {
            Location::InTriangle(t) if self.face_in_domain(t) => {}
            Location::OnEdge(t, i) if !self.faces[t].c[i] && self.face_in_domain(t) => {}
            Location::OnVertex(w) if w == id => return Ok(Relocation::Unchanged),
            location => {
                trace!(vertex = id, ?location, "relocation rejected: target not free");
                return Ok(Relocation::Rejected);
            }
        }

        let star_stays_valid = fan.iter().all(|&t| {
            let face = &self.faces[t];
            slot(face, id).is_some_and(|k| {
                let u = self.vertices[face.v[next(k)]].point;
                let w = self.vertices[face.v[prev(k)]].point;
                orientation(target, u, w).is_ccw()
            })
        });

        if star_stays_valid {
            self.vertices[id].point = target;
            self.legalize_around(&fan);
            return Ok(Relocation::Moved);
        }

        if !self.remove_vertex(id) {
            trace!(vertex = id, "relocation rejected: star could not be re-triangulated");
            return Ok(Relocation::Rejected);
        }

        self.vertices[id].point = target;
        let location = self.locate(target);
        if self.is_free_location(location) {
            self.insert_at(id, location);
            return Ok(Relocation::Moved);
        }

        // The hole left by the removal classified the target differently.
        // Put the vertex back where it was.
        self.vertices[id].point = from;
        let location = self.locate(from);
        if !self.is_free_location(location) {
            return Err(RelaxError::InvalidTriangulation(format!(
                "vertex {id} could not be restored after a failed relocation"
            )));
        }
        self.insert_at(id, location);
        trace!(vertex = id, "relocation rejected: target not free after removal");
        Ok(Relocation::Rejected)
    }

    /// Checks the structural and Delaunay invariants.
    ///
    /// # Errors
    ///
    /// [`RelaxError::InvalidTriangulation`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RelaxError::InvalidTriangulation(msg));

        for (t, face) in self.faces.iter().enumerate() {
            if !face.alive {
                continue;
            }

            let [a, b, c] = face.v;
            if a == b || b == c || c == a {
                return invalid(format!("triangle {t} repeats a vertex"));
            }
            let [pa, pb, pc] = face.v.map(|v| self.vertices[v].point);
            if !orientation(pa, pb, pc).is_ccw() {
                return invalid(format!("triangle {t} is not counter-clockwise"));
            }

            for i in 0..3 {
                let u = face.v[next(i)];
                let w = face.v[prev(i)];
                if face.c[i] != self.constraints.contains(&edge_key(u, w)) {
                    return invalid(format!("edge ({u}, {w}) has a stale constraint flag"));
                }

                let n = face.n[i];
                if n == NONE {
                    if !(is_ghost(u) && is_ghost(w)) {
                        return invalid(format!("edge ({u}, {w}) has no neighbour"));
                    }
                    continue;
                }
                if !self.faces[n].alive {
                    return invalid(format!("triangle {t} links to dead triangle {n}"));
                }
                let Some(j) = self.edge_slot(n, w, u) else {
                    return invalid(format!("triangles {t} and {n} do not share edge ({u}, {w})"));
                };
                if self.faces[n].n[j] != t {
                    return invalid(format!("adjacency between {t} and {n} is not symmetric"));
                }
                if !face.c[i] && self.should_flip(t, i) {
                    return invalid(format!("edge ({u}, {w}) is not locally Delaunay"));
                }
            }
        }

        for &(a, b) in &self.constraints {
            if self.find_edge(a, b).is_none() {
                return invalid(format!("constraint ({a}, {b}) is not an edge"));
            }
        }

        for (v, vertex) in self.vertices.iter().enumerate() {
            let hint_ok = self
                .faces
                .get(vertex.hint)
                .is_some_and(|face| face.alive && slot(face, v).is_some());
            if !hint_ok {
                return invalid(format!("vertex {v} has a stale triangle hint"));
            }
            let degree = self
                .constraints
                .iter()
                .filter(|&&(a, b)| a == v || b == v)
                .count();
            if degree != vertex.constraint_degree as usize {
                return invalid(format!("vertex {v} has a wrong constraint degree"));
            }
        }

        Ok(())
    }

    fn insert_at(&mut self, v: usize, location: Location) {
        match location {
            Location::InTriangle(t) => self.split_triangle(t, v),
            Location::OnEdge(t, i) => self.split_edge(t, i, v),
            Location::OnVertex(_) | Location::Outside => {}
        }
    }

    /// True if a vertex could be inserted at `location` without touching a
    /// constraint.
    fn is_free_location(&self, location: Location) -> bool {
        match location {
            Location::InTriangle(_) => true,
            Location::OnEdge(t, i) => !self.faces[t].c[i] && self.faces[t].n[i] != NONE,
            Location::OnVertex(_) | Location::Outside => false,
        }
    }

    /// 1→3 split.
    fn split_triangle(&mut self, t: usize, v: usize) {
        let [a, b, c] = self.faces[t].v;
        let created = self.retriangulate(&[t], &[[a, b, v], [b, c, v], [c, a, v]]);
        self.walk_start = created[0];
        self.legalize_around(&created);
    }

    /// 2→4 split of the edge opposite slot `i` of `t`.
    fn split_edge(&mut self, t: usize, i: usize, v: usize) {
        let face = self.faces[t];
        let (x, a, b) = (face.v[i], face.v[next(i)], face.v[prev(i)]);
        let n = face.n[i];
        let Some(j) = self.edge_slot(n, b, a) else {
            return;
        };
        let y = self.faces[n].v[j];
        let other = self.faces[n].in_domain;

        if self.constraints.remove(&edge_key(a, b)) {
            self.constraints.insert(edge_key(a, v));
            self.constraints.insert(edge_key(v, b));
            self.vertices[v].constraint_degree += 2;
        }

        let created = self.retriangulate(&[t, n], &[[x, a, v], [x, v, b], [y, b, v], [y, v, a]]);

        // The split edge may separate two regions.
        self.faces[created[0]].in_domain = face.in_domain;
        self.faces[created[1]].in_domain = face.in_domain;
        self.faces[created[2]].in_domain = other;
        self.faces[created[3]].in_domain = other;

        self.walk_start = created[0];
        self.legalize_around(&created);
    }

    /// Replaces the triangles `removed` by `triples`, which must tile the same
    /// region. Returns the new triangle ids.
    ///
    /// Constraint flags are taken from the constraint set and the domain flag
    /// is the conjunction of the removed triangles' flags.
    fn retriangulate(&mut self, removed: &[usize], triples: &[[usize; 3]]) -> Vec<usize> {
        let mut boundary: HashMap<(usize, usize), usize> = HashMap::new();
        let mut in_domain = true;

        for &t in removed {
            let face = self.faces[t];
            in_domain &= face.in_domain;
            for i in 0..3 {
                let n = face.n[i];
                if n != NONE && removed.contains(&n) {
                    continue;
                }
                boundary.insert((face.v[next(i)], face.v[prev(i)]), n);
            }
        }

        for &t in removed {
            self.faces[t].alive = false;
            self.free.push(t);
        }
        self.live -= removed.len();

        let mut half_edges: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
        let mut created = Vec::with_capacity(triples.len());

        for &v in triples {
            let c = [0, 1, 2].map(|i| self.constraints.contains(&edge_key(v[next(i)], v[prev(i)])));
            let t = self.alloc(Face {
                v,
                n: [NONE; 3],
                c,
                in_domain,
                alive: true,
            });
            created.push(t);

            for i in 0..3 {
                let (u, w) = (v[next(i)], v[prev(i)]);
                if let Some(&(other, j)) = half_edges.get(&(w, u)) {
                    self.faces[t].n[i] = other;
                    self.faces[other].n[j] = t;
                } else if let Some(&outer) = boundary.get(&(u, w)) {
                    self.faces[t].n[i] = outer;
                    if outer != NONE {
                        if let Some(j) = self.edge_slot(outer, w, u) {
                            self.faces[outer].n[j] = t;
                        }
                    }
                }
                half_edges.insert((u, w), (t, i));
            }

            for x in v {
                self.vertices[x].hint = t;
            }
        }

        created
    }

    fn alloc(&mut self, face: Face) -> usize {
        self.live += 1;
        match self.free.pop() {
            Some(t) => {
                self.faces[t] = face;
                t
            }
            None => {
                self.faces.push(face);
                self.faces.len() - 1
            }
        }
    }

    /// True if the edge opposite slot `i` of `t` may be flipped and is not
    /// locally Delaunay.
    fn should_flip(&self, t: usize, i: usize) -> bool {
        let face = &self.faces[t];
        let n = face.n[i];
        if face.c[i] || n == NONE {
            return false;
        }
        let (p, a, b) = (face.v[i], face.v[next(i)], face.v[prev(i)]);
        let Some(j) = self.edge_slot(n, b, a) else {
            return false;
        };
        let o = self.faces[n].v[j];

        let [pp, pa, pb, po] = [p, a, b, o].map(|x| self.vertices[x].point);
        orientation(pp, pa, po).is_ccw()
            && orientation(pp, po, pb).is_ccw()
            && in_circumcircle(pp, pa, pb, po)
    }

    /// Lawson flipping over a stack of edges given as vertex pairs.
    fn legalize(&mut self, mut stack: Vec<(usize, usize)>) {
        let mut budget = 16 * self.live + 1024;

        while let Some((a, b)) = stack.pop() {
            let Some((t, i)) = self.find_edge(a, b) else {
                continue;
            };
            if !self.should_flip(t, i) {
                continue;
            }
            if budget == 0 {
                warn!("edge flipping hit its step cap; triangulation may not be Delaunay");
                return;
            }
            budget -= 1;

            let face = self.faces[t];
            let (p, a, b) = (face.v[i], face.v[next(i)], face.v[prev(i)]);
            let n = face.n[i];
            let Some(j) = self.edge_slot(n, b, a) else {
                continue;
            };
            let o = self.faces[n].v[j];

            let created = self.retriangulate(&[t, n], &[[p, a, o], [p, o, b]]);
            for t in created {
                stack.extend(face_edges(&self.faces[t]));
            }
        }
    }

    /// Legalizes every edge of the given triangles.
    fn legalize_around(&mut self, triangles: &[usize]) {
        let edges = triangles
            .iter()
            .flat_map(|&t| face_edges(&self.faces[t]))
            .collect();
        self.legalize(edges);
    }

    /// Inserts constraint `ab` between two distinct real vertices.
    fn force_edge(&mut self, a: usize, b: usize) -> Result<()> {
        if self.constraints.contains(&edge_key(a, b)) {
            return Ok(());
        }
        if self.find_edge(a, b).is_some() {
            self.mark_constraint(a, b);
            return Ok(());
        }

        let pa = self.vertices[a].point;
        let pb = self.vertices[b].point;
        let span = (pb - pa).magnitude_squared();

        // Find the triangle at `a` that the segment leaves through.
        let mut start = None;
        for t in self.fan(a) {
            let face = &self.faces[t];
            let Some(k) = slot(face, a) else {
                continue;
            };
            let (u, w) = (face.v[next(k)], face.v[prev(k)]);

            for q in [u, w] {
                let pq = self.vertices[q].point;
                let along = (pq - pa).dot(pb - pa);
                if orientation(pa, pb, pq) == Orientation::Collinear
                    && along > F::zero()
                    && (pq - pa).magnitude_squared() < span
                {
                    return self.split_constraint(a, q, b);
                }
            }

            let pu = self.vertices[u].point;
            let pw = self.vertices[w].point;
            if orientation(pa, pb, pu).is_cw() && orientation(pa, pb, pw).is_ccw() {
                start = Some((t, k));
                break;
            }
        }
        let Some((mut t, mut e)) = start else {
            return Err(RelaxError::DegenerateGeometry { vertex: a });
        };

        // Walk along the segment, collecting crossed triangles and the
        // vertices on either side.
        let mut crossed = vec![t];
        let mut left = vec![self.faces[t].v[prev(e)]];
        let mut right = vec![self.faces[t].v[next(e)]];

        loop {
            let face = self.faces[t];
            if face.c[e] {
                return Err(RelaxError::ConstraintIntersection { a, b });
            }
            let (r, l) = (face.v[next(e)], face.v[prev(e)]);
            let n = face.n[e];
            if n == NONE {
                return Err(RelaxError::DegenerateGeometry { vertex: a });
            }
            let Some(j) = self.edge_slot(n, l, r) else {
                return Err(RelaxError::InvalidTriangulation(format!(
                    "triangles {t} and {n} are not mutually linked"
                )));
            };
            let q = self.faces[n].v[j];
            crossed.push(n);

            if q == b {
                break;
            }
            match orientation(pa, pb, self.vertices[q].point) {
                Orientation::CounterClockwise => {
                    left.push(q);
                    e = next(j);
                }
                Orientation::Clockwise => {
                    right.push(q);
                    e = prev(j);
                }
                Orientation::Collinear => return self.split_constraint(a, q, b),
            }
            t = n;
        }

        // Both pockets are counter-clockwise with `ab` as one side.
        let mut left_pocket = vec![a, b];
        left_pocket.extend(left.iter().rev());
        let mut right_pocket = vec![a];
        right_pocket.extend(&right);
        right_pocket.push(b);

        let (Some(mut triples), Some(right_triples)) =
            (self.ear_clip(&left_pocket), self.ear_clip(&right_pocket))
        else {
            return Err(RelaxError::DegenerateGeometry { vertex: a });
        };
        triples.extend(right_triples);

        self.constraints.insert(edge_key(a, b));
        self.vertices[a].constraint_degree += 1;
        self.vertices[b].constraint_degree += 1;

        let created = self.retriangulate(&crossed, &triples);
        self.walk_start = created[0];
        self.legalize_around(&created);

        trace!(a, b, crossed = crossed.len(), "inserted constraint");
        Ok(())
    }

    fn split_constraint(&mut self, a: usize, mid: usize, b: usize) -> Result<()> {
        trace!(a, mid, b, "constraint passes through a vertex; splitting");
        self.force_edge(a, mid)?;
        self.force_edge(mid, b)
    }

    /// Flags an existing edge as a constraint.
    fn mark_constraint(&mut self, a: usize, b: usize) {
        let Some((t, i)) = self.find_edge(a, b) else {
            return;
        };
        self.constraints.insert(edge_key(a, b));
        self.vertices[a].constraint_degree += 1;
        self.vertices[b].constraint_degree += 1;

        self.faces[t].c[i] = true;
        let face = self.faces[t];
        let n = face.n[i];
        if n != NONE {
            if let Some(j) = self.edge_slot(n, face.v[prev(i)], face.v[next(i)]) {
                self.faces[n].c[j] = true;
            }
        }
    }

    /// Removes a real vertex by re-triangulating its star. Returns false,
    /// leaving everything untouched, if the star polygon cannot be
    /// triangulated.
    fn remove_vertex(&mut self, v: usize) -> bool {
        let fan = self.fan(v);
        let ring: Option<Vec<usize>> = fan
            .iter()
            .map(|&t| slot(&self.faces[t], v).map(|k| self.faces[t].v[next(k)]))
            .collect();
        let Some(triples) = ring.and_then(|ring| self.ear_clip(&ring)) else {
            return false;
        };

        let created = self.retriangulate(&fan, &triples);
        self.vertices[v].hint = NONE;
        self.walk_start = created[0];
        self.legalize_around(&created);
        true
    }

    /// Ear clipping of a simple counter-clockwise polygon given by vertex ids.
    ///
    /// Returns `None` if no ear can be found, which only happens for
    /// degenerate input.
    fn ear_clip(&self, polygon: &[usize]) -> Option<Vec<[usize; 3]>> {
        if polygon.len() < 3 {
            return None;
        }

        let mut ring = polygon.to_vec();
        let mut triples = Vec::with_capacity(ring.len() - 2);

        while ring.len() > 3 {
            let m = ring.len();
            let ear = (0..m).find(|&i| self.is_ear(&ring, i))?;
            triples.push([ring[(ear + m - 1) % m], ring[ear], ring[(ear + 1) % m]]);
            ring.remove(ear);
        }

        let [a, b, c] = [ring[0], ring[1], ring[2]].map(|x| self.vertices[x].point);
        if !orientation(a, b, c).is_ccw() {
            return None;
        }
        triples.push([ring[0], ring[1], ring[2]]);
        Some(triples)
    }

    fn is_ear(&self, ring: &[usize], i: usize) -> bool {
        let m = ring.len();
        let (ia, ib, ic) = (ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]);
        let [a, b, c] = [ia, ib, ic].map(|x| self.vertices[x].point);

        if !orientation(a, b, c).is_ccw() {
            return false;
        }

        // No other polygon vertex may lie inside or on the ear.
        ring.iter()
            .filter(|&&x| x != ia && x != ib && x != ic)
            .all(|&x| {
                let p = self.vertices[x].point;
                orientation(a, b, p).is_cw()
                    || orientation(b, c, p).is_cw()
                    || orientation(c, a, p).is_cw()
            })
    }

    fn path_touches_constraint(&self, from: Point2<F>, to: Point2<F>) -> bool {
        let (lo_x, hi_x) = (from.x.min(to.x), from.x.max(to.x));
        let (lo_y, hi_y) = (from.y.min(to.y), from.y.max(to.y));

        self.constraints.iter().any(|&(a, b)| {
            let pa = self.vertices[a].point;
            let pb = self.vertices[b].point;
            if pa.x.max(pb.x) < lo_x
                || pa.x.min(pb.x) > hi_x
                || pa.y.max(pb.y) < lo_y
                || pa.y.min(pb.y) > hi_y
            {
                return false;
            }
            segments_touch(from, to, pa, pb)
        })
    }
}

/// The three edges of a triangle as vertex pairs.
fn face_edges(face: &Face) -> [(usize, usize); 3] {
    let [a, b, c] = face.v;
    [(a, b), (b, c), (c, a)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::tests::constrained_square;
    use approx::assert_relative_eq;

    fn grid(n: usize) -> Vec<Point2<f64>> {
        let mut points = Vec::new();
        for i in 0..n {
            for j in 0..n {
                points.push(Point2::new(i as f64, j as f64));
            }
        }
        points
    }

    #[test]
    fn test_insert_three_points() {
        let points = [
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
        ];
        let (tri, ids) = Triangulation::from_points(&points).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(tri.num_triangles(), 1);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_insert_grid_is_delaunay() {
        let (tri, _) = Triangulation::from_points(&grid(4)).unwrap();
        // 3x3 squares, two triangles each.
        assert_eq!(tri.num_triangles(), 18);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_insert_duplicate_returns_existing() {
        let (mut tri, ids) = constrained_square(&[Point2::new(0.5, 0.5)]);
        let again = tri.insert(Point2::new(0.5, 0.5)).unwrap();
        assert_eq!(again, ids[4]);
        assert_eq!(tri.num_vertices(), 5);
    }

    #[test]
    fn test_insert_rejects_bad_points() {
        let (mut tri, _) = constrained_square(&[]);
        assert!(matches!(
            tri.insert(Point2::new(f64::NAN, 0.5)),
            Err(RelaxError::NonFinitePoint)
        ));
        assert!(matches!(
            tri.insert(Point2::new(1.0e9, 0.5)),
            Err(RelaxError::OutOfBounds)
        ));
    }

    #[test]
    fn test_insert_on_constraint_splits_it() {
        let (mut tri, ids) = constrained_square(&[]);
        let mid = tri.insert(Point2::new(0.5, 0.0)).unwrap();

        assert!(tri.is_constrained(mid));
        assert!(tri.is_constraint_edge(ids[0], mid));
        assert!(tri.is_constraint_edge(mid, ids[1]));
        assert!(!tri.is_constraint_edge(ids[0], ids[1]));
        assert_eq!(tri.constraints().count(), 5);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_constraint_forces_edge() {
        // Without the constraint the short diagonal (1)-(3) wins.
        let points = [
            Point2::new(0.0_f64, 0.0),
            Point2::new(2.0, -0.5),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 0.5),
        ];
        let (mut tri, ids) = Triangulation::from_points(&points).unwrap();
        assert!(tri.find_edge(ids[1].0, ids[3].0).is_some());

        tri.insert_constraint(ids[0], ids[2]).unwrap();
        assert!(tri.find_edge(ids[0].0, ids[2].0).is_some());
        assert!(tri.find_edge(ids[1].0, ids[3].0).is_none());
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_constraint_across_many_triangles() {
        let mut points = grid(5);
        points.push(Point2::new(-0.5, 2.2));
        points.push(Point2::new(4.5, 1.7));
        let (mut tri, ids) = Triangulation::from_points(&points).unwrap();

        tri.insert_constraint(ids[25], ids[26]).unwrap();
        assert!(tri.is_constraint_edge(ids[25], ids[26]));
        assert!(tri.find_edge(ids[25].0, ids[26].0).is_some());
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_constraint_through_vertex_is_split() {
        let points = [
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
        ];
        let (mut tri, ids) = Triangulation::from_points(&points).unwrap();
        tri.insert_constraint(ids[0], ids[2]).unwrap();

        assert!(tri.is_constraint_edge(ids[0], ids[1]));
        assert!(tri.is_constraint_edge(ids[1], ids[2]));
        assert!(!tri.is_constraint_edge(ids[0], ids[2]));
        assert!(tri.is_constrained(ids[1]));
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_crossing_constraints_rejected() {
        let (mut tri, ids) = constrained_square(&[]);
        tri.insert_constraint(ids[0], ids[2]).unwrap();
        assert!(matches!(
            tri.insert_constraint(ids[1], ids[3]),
            Err(RelaxError::ConstraintIntersection { .. })
        ));
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_degenerate_constraint() {
        let (mut tri, ids) = constrained_square(&[]);
        assert!(matches!(
            tri.insert_constraint(ids[1], ids[1]),
            Err(RelaxError::DegenerateConstraint { .. })
        ));
    }

    #[test]
    fn test_constraint_is_idempotent() {
        let (mut tri, ids) = constrained_square(&[]);
        tri.insert_constraint(ids[0], ids[1]).unwrap();
        tri.insert_constraint(ids[1], ids[0]).unwrap();
        assert_eq!(tri.constraints().count(), 4);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_relocate_in_place() {
        let (mut tri, ids) = constrained_square(&[Point2::new(0.5, 0.5)]);
        let result = tri.relocate(ids[4], Point2::new(0.45, 0.55)).unwrap();

        assert_eq!(result, Relocation::Moved);
        assert_relative_eq!(tri.point(ids[4]).x, 0.45);
        assert_relative_eq!(tri.point(ids[4]).y, 0.55);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_relocate_across_neighbours() {
        let interior = [
            Point2::new(0.2, 0.2),
            Point2::new(0.5, 0.5),
            Point2::new(0.8, 0.3),
            Point2::new(0.3, 0.8),
        ];
        let (mut tri, ids) = constrained_square(&interior);

        // Far enough that the star of (0.2, 0.2) cannot stay valid.
        let result = tri.relocate(ids[4], Point2::new(0.85, 0.85)).unwrap();
        assert_eq!(result, Relocation::Moved);
        assert_eq!(tri.point(ids[4]), Point2::new(0.85, 0.85));
        assert_eq!(tri.num_vertices(), 8);
        assert_eq!(tri.num_triangles(), 10);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_relocate_rejections() {
        let (mut tri, ids) = constrained_square(&[Point2::new(0.5, 0.5), Point2::new(0.25, 0.25)]);
        let v = ids[4];

        for target in [
            Point2::new(f64::INFINITY, 0.5),
            Point2::new(1.5, 0.5),
            Point2::new(0.25, 0.25),
            Point2::new(0.5, 0.0),
        ] {
            assert_eq!(tri.relocate(v, target).unwrap(), Relocation::Rejected);
            assert_eq!(tri.point(v), Point2::new(0.5, 0.5));
        }
        assert_eq!(tri.relocate(v, Point2::new(0.5, 0.5)).unwrap(), Relocation::Unchanged);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_relocate_next_to_hole_is_rejected() {
        let interior = [
            Point2::new(0.4, 0.4),
            Point2::new(0.6, 0.4),
            Point2::new(0.6, 0.6),
            Point2::new(0.4, 0.6),
            Point2::new(0.5, 0.5),
            Point2::new(0.2, 0.25),
        ];
        let (mut tri, ids) = constrained_square(&interior);
        for i in 0..4 {
            tri.insert_constraint(ids[4 + i], ids[4 + (i + 1) % 4]).unwrap();
        }
        tri.mark_domain(&[Point2::new(0.45, 0.42)]).unwrap();
        let marked = |tri: &Triangulation<f64>| {
            tri.triangles().filter(|&t| tri.is_in_domain(t)).count()
        };
        let before = marked(&tri);

        // The center vertex sits inside the hole.
        let center = ids[8];
        let moved = tri.relocate(center, Point2::new(0.52, 0.5)).unwrap();
        assert_eq!(moved, Relocation::Rejected);
        assert_eq!(tri.point(center), Point2::new(0.5, 0.5));
        assert_eq!(marked(&tri), before);

        // A free vertex away from the hole still moves.
        let moved = tri.relocate(ids[9], Point2::new(0.22, 0.25)).unwrap();
        assert_eq!(moved, Relocation::Moved);
        assert_eq!(marked(&tri), before);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_relocate_hull_vertex_is_rejected() {
        // Without constraints the hull vertices touch the enclosing triangle.
        // A target inside the hull is free, but the star is not.
        let points = [
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.5),
        ];
        let (mut tri, ids) = Triangulation::from_points(&points).unwrap();
        let triangles = tri.num_triangles();

        let moved = tri.relocate(ids[0], Point2::new(0.1, 0.1)).unwrap();
        assert_eq!(moved, Relocation::Rejected);
        assert_eq!(tri.point(ids[0]), Point2::new(0.0, 0.0));
        assert_eq!(tri.num_triangles(), triangles);
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_relocate_constrained_vertex_is_an_error() {
        let (mut tri, ids) = constrained_square(&[Point2::new(0.5, 0.5)]);
        let before = tri.point(ids[0]);
        assert!(matches!(
            tri.relocate(ids[0], Point2::new(0.1, 0.1)),
            Err(RelaxError::ConstrainedVertex { .. })
        ));
        assert_eq!(tri.point(ids[0]), before);
    }

    #[test]
    fn test_relocate_keeps_constraints() {
        let interior = [
            Point2::new(0.3, 0.3),
            Point2::new(0.7, 0.3),
            Point2::new(0.7, 0.7),
            Point2::new(0.3, 0.7),
        ];
        let (mut tri, ids) = constrained_square(&interior);
        tri.insert_constraint(ids[4], ids[6]).unwrap();
        let free = tri.insert(Point2::new(0.6, 0.38)).unwrap();

        // Crossing the diagonal constraint is refused.
        assert_eq!(tri.relocate(free, Point2::new(0.38, 0.6)).unwrap(), Relocation::Rejected);
        assert_eq!(tri.relocate(free, Point2::new(0.64, 0.33)).unwrap(), Relocation::Moved);
        assert!(tri.is_constraint_edge(ids[4], ids[6]));
        assert!(tri.validate().is_ok());
    }

    #[test]
    fn test_many_relocations_stay_valid() {
        let interior: Vec<Point2<f64>> = (1..6)
            .flat_map(|i| (1..6).map(move |j| Point2::new(i as f64 / 6.0, j as f64 / 6.0)))
            .collect();
        let (mut tri, ids) = constrained_square(&interior);

        for (k, &v) in ids[4..].iter().enumerate() {
            let p = tri.point(v);
            let angle = k as f64;
            let target = Point2::new(p.x + 0.1 * angle.cos(), p.y + 0.1 * angle.sin());
            tri.relocate(v, target).unwrap();
            tri.validate().unwrap();
        }
    }
}
