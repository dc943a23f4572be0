//! Point location by remembering stochastic walk.

use super::{next, prev, Triangulation, NONE};
use crate::primitives::Point2;
use crate::tolerance::{orientation, Orientation};
use num_traits::Float;

/// Where a query point falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Location {
    /// Strictly inside a triangle.
    InTriangle(usize),
    /// On the edge of triangle `.0` opposite slot `.1`.
    OnEdge(usize, usize),
    /// On an existing vertex.
    OnVertex(usize),
    /// Outside the enclosing triangle.
    Outside,
}

impl<F: Float> Triangulation<F> {
    /// Locates `p`, walking from the most recently created triangle.
    pub(super) fn locate(&self, p: Point2<F>) -> Location {
        let start = match self.faces.get(self.walk_start) {
            Some(face) if face.alive => Some(self.walk_start),
            _ => self.faces.iter().position(|face| face.alive),
        };
        let Some(start) = start else {
            return Location::Outside;
        };

        self.walk(p, start).unwrap_or_else(|| self.scan(p))
    }

    /// Visibility walk with a randomized edge order, so it cannot cycle
    /// forever. Gives up after a step budget.
    fn walk(&self, p: Point2<F>, start: usize) -> Option<Location> {
        let mut t = start;
        let mut state = 0x9E37_79B9_7F4A_7C15_u64 ^ (start as u64);
        let budget = 4 * self.live + 64;

        for _ in 0..budget {
            let face = &self.faces[t];
            state = xorshift(state);
            let offset = (state % 3) as usize;

            let mut crossed = None;
            for s in 0..3 {
                let i = (offset + s) % 3;
                let a = self.vertices[face.v[next(i)]].point;
                let b = self.vertices[face.v[prev(i)]].point;
                if orientation(a, b, p).is_cw() {
                    crossed = Some(face.n[i]);
                    break;
                }
            }

            match crossed {
                None => return Some(self.classify(t, p)),
                Some(NONE) => return Some(Location::Outside),
                Some(n) => t = n,
            }
        }
        None
    }

    /// Linear fallback for when the walk runs out of steps.
    fn scan(&self, p: Point2<F>) -> Location {
        for (t, face) in self.faces.iter().enumerate() {
            if !face.alive {
                continue;
            }
            let outside = (0..3).any(|i| {
                let a = self.vertices[face.v[next(i)]].point;
                let b = self.vertices[face.v[prev(i)]].point;
                orientation(a, b, p).is_cw()
            });
            if !outside {
                return self.classify(t, p);
            }
        }
        Location::Outside
    }

    /// Classifies a point known to be inside or on the boundary of `t`.
    fn classify(&self, t: usize, p: Point2<F>) -> Location {
        let face = &self.faces[t];

        if let Some(&v) = face.v.iter().find(|&&v| self.vertices[v].point == p) {
            return Location::OnVertex(v);
        }

        let mut on_edge = [false; 3];
        for (i, flag) in on_edge.iter_mut().enumerate() {
            let a = self.vertices[face.v[next(i)]].point;
            let b = self.vertices[face.v[prev(i)]].point;
            *flag = orientation(a, b, p) == Orientation::Collinear;
        }

        match on_edge {
            [false, false, false] => Location::InTriangle(t),
            [true, false, false] => Location::OnEdge(t, 0),
            [false, true, false] => Location::OnEdge(t, 1),
            [false, false, true] => Location::OnEdge(t, 2),
            // Two edges meet only at the corner opposite the third.
            [false, true, true] => Location::OnVertex(face.v[0]),
            [true, false, true] => Location::OnVertex(face.v[1]),
            [true, true, false] | [true, true, true] => Location::OnVertex(face.v[2]),
        }
    }
}

#[inline]
fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}
