//! Domain marking: which triangles belong to the mesh.

use super::locate::Location;
use super::{is_ghost, Triangulation, NONE};
use crate::error::{RelaxError, Result};
use crate::primitives::Point2;
use num_traits::Float;
use tracing::debug;

impl<F: Float> Triangulation<F> {
    /// Marks the meshed domain by flood fill across non-constraint edges.
    ///
    /// - Triangles touching the enclosing triangle are always outside.
    /// - If there is at least one constraint, every triangle reachable from
    ///   the outside without crossing a constraint is outside too.
    /// - Each seed marks the region containing it as a hole.
    ///
    /// The seeds are remembered, and marking is repeated whenever a
    /// constraint is added later.
    ///
    /// # Errors
    ///
    /// - [`RelaxError::NonFinitePoint`] or [`RelaxError::OutOfBounds`] for a
    ///   seed that cannot be located.
    /// - [`RelaxError::AmbiguousSeed`] for a seed on a constraint edge or on a
    ///   constrained vertex.
    ///
    /// Nothing is changed when an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use relaxum::triangulation::Triangulation;
    /// use relaxum::Point2;
    ///
    /// // A square with a square hole.
    /// let points = [
    ///     Point2::new(0.0_f64, 0.0),
    ///     Point2::new(3.0, 0.0),
    ///     Point2::new(3.0, 3.0),
    ///     Point2::new(0.0, 3.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(2.0, 1.0),
    ///     Point2::new(2.0, 2.0),
    ///     Point2::new(1.0, 2.0),
    /// ];
    /// let (mut tri, ids) = Triangulation::from_points(&points)?;
    /// for ring in [0, 4] {
    ///     for i in 0..4 {
    ///         tri.insert_constraint(ids[ring + i], ids[ring + (i + 1) % 4])?;
    ///     }
    /// }
    /// tri.mark_domain(&[Point2::new(1.5, 1.5)])?;
    ///
    /// let inside = tri.triangles().filter(|&t| tri.is_in_domain(t)).count();
    /// assert_eq!(inside, 8);
    /// assert_eq!(tri.num_triangles(), 10);
    /// # Ok::<(), relaxum::RelaxError>(())
    /// ```
    pub fn mark_domain(&mut self, seeds: &[Point2<F>]) -> Result<()> {
        let mut inside: Vec<bool> = vec![true; self.faces.len()];

        if !self.constraints.is_empty() {
            let outer: Vec<usize> = self
                .faces
                .iter()
                .enumerate()
                .filter(|(_, face)| face.alive && face.v.iter().any(|&v| is_ghost(v)))
                .map(|(t, _)| t)
                .collect();
            self.flood(&mut inside, outer);
        }

        for &seed in seeds {
            let start = self.seed_triangles(seed)?;
            self.flood(&mut inside, start);
        }

        for (face, inside) in self.faces.iter_mut().zip(inside) {
            face.in_domain = inside;
        }
        self.seeds = Some(seeds.to_vec());

        debug!(
            seeds = seeds.len(),
            constraints = self.constraints.len(),
            "marked domain"
        );
        Ok(())
    }

    /// Triangles to start a hole flood from.
    fn seed_triangles(&self, seed: Point2<F>) -> Result<Vec<usize>> {
        if !seed.is_finite() {
            return Err(RelaxError::NonFinitePoint);
        }

        let ambiguous = || RelaxError::AmbiguousSeed {
            x: seed.x.to_f64().unwrap_or(f64::NAN),
            y: seed.y.to_f64().unwrap_or(f64::NAN),
        };

        match self.locate(seed) {
            Location::InTriangle(t) => Ok(vec![t]),
            Location::OnEdge(t, i) if self.faces[t].c[i] => Err(ambiguous()),
            Location::OnEdge(t, _) => Ok(vec![t]),
            Location::OnVertex(v) if is_ghost(v) => Err(RelaxError::OutOfBounds),
            Location::OnVertex(v) if self.vertices[v].constraint_degree > 0 => Err(ambiguous()),
            Location::OnVertex(v) => Ok(self.fan(v)),
            Location::Outside => Err(RelaxError::OutOfBounds),
        }
    }

    /// Clears `inside` for every triangle reachable from `start` without
    /// crossing a constraint.
    fn flood(&self, inside: &mut [bool], mut stack: Vec<usize>) {
        while let Some(t) = stack.pop() {
            if !inside[t] {
                continue;
            }
            inside[t] = false;

            let face = &self.faces[t];
            for i in 0..3 {
                let n = face.n[i];
                if !face.c[i] && n != NONE && inside[n] {
                    stack.push(n);
                }
            }
        }
    }
}
