//! One Gauss-Seidel pass of Lloyd relaxation.

use super::displacement::{displacement, displacement_ratio};
use crate::error::Result;
use crate::triangulation::{voronoi_cell, Relocation, Triangulation, VertexId};
use num_traits::Float;
use tracing::trace;

/// What happened during a single relaxation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport<F> {
    /// Largest displacement ratio among vertices that were not frozen,
    /// rejected moves included.
    pub max_ratio: F,
    /// Vertices relocated to their cell centroid.
    pub moved: usize,
    /// Vertices whose move fell below the freeze bound.
    pub frozen: usize,
    /// Vertices without a cell (fan touches the outside or a hole).
    pub skipped: usize,
    /// Vertices whose cell or centroid could not be computed.
    pub degenerate: usize,
    /// Relocations the triangulation refused.
    pub rejected: usize,
}

impl<F: Float> Default for StepReport<F> {
    fn default() -> Self {
        Self {
            max_ratio: F::zero(),
            moved: 0,
            frozen: 0,
            skipped: 0,
            degenerate: 0,
            rejected: 0,
        }
    }
}

impl<F: Float> StepReport<F> {
    /// Records the outcome of an attempted move with displacement `ratio`.
    ///
    /// A rejected move still counts toward `max_ratio`: the vertex is away
    /// from its centroid, so the pass is not a fixed point.
    pub fn record(&mut self, ratio: F, outcome: Relocation) {
        self.max_ratio = self.max_ratio.max(ratio);
        match outcome {
            Relocation::Moved => self.moved += 1,
            Relocation::Unchanged => {}
            Relocation::Rejected => self.rejected += 1,
        }
    }
}

/// Moves every unconstrained vertex toward the centroid of its Voronoi cell.
///
/// Vertices are visited in ascending handle order and each cell is computed
/// against the triangulation as left by the previous moves. A move whose
/// ratio (see [`displacement_ratio`]) is below `freeze_bound` is skipped and
/// does not count toward [`StepReport::max_ratio`]. Moves the triangulation
/// refuses do count.
///
/// Degenerate neighbourhoods only freeze the vertex for this pass.
///
/// # Errors
///
/// Any error other than [`crate::RelaxError::DegenerateGeometry`]. The
/// triangulation is valid when the error is returned.
pub fn relax_step<F: Float>(tri: &mut Triangulation<F>, freeze_bound: F) -> Result<StepReport<F>> {
    let mut report: StepReport<F> = StepReport::default();
    let movable: Vec<VertexId> = tri.movable_vertices().collect();

    for v in movable {
        let cell = match voronoi_cell(tri, v) {
            Ok(Some(cell)) => cell,
            Ok(None) => {
                report.skipped += 1;
                continue;
            }
            Err(err) if err.is_recoverable() => {
                trace!(vertex = v.index(), %err, "no cell");
                report.degenerate += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        let Some(centroid) = cell.centroid() else {
            report.degenerate += 1;
            continue;
        };

        let position = tri.point(v);
        let d = displacement(position, centroid);
        let ratio = displacement_ratio(tri, v, d);
        if ratio < freeze_bound {
            report.frozen += 1;
            continue;
        }

        let outcome = tri.relocate(v, centroid)?;
        if outcome == Relocation::Rejected {
            trace!(vertex = v.index(), "move to centroid rejected");
        }
        report.record(ratio, outcome);
    }

    Ok(report)
}
