//! Lloyd relaxation toward a centroidal Voronoi tessellation.
//!
//! Each pass visits the unconstrained vertices in handle order and moves
//! every one of them to the area centroid of its Voronoi cell. The
//! triangulation is repaired after each individual move, so later vertices in
//! the same pass see the updated mesh.
//!
//! Move sizes are measured relative to the moving vertex's shortest incident
//! edge. That ratio drives both the freeze bound (tiny moves are skipped) and
//! the convergence test.
//!
//! # Example
//!
//! ```
//! use relaxum::lloyd::{relax_step, LloydOptions, Termination};
//! use relaxum::{optimize, Point2, Triangulation};
//!
//! let points = [
//!     Point2::new(0.0_f64, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(0.3, 0.3),
//!     Point2::new(0.5, 0.6),
//! ];
//! let (mut tri, ids) = Triangulation::from_points(&points)?;
//! for i in 0..4 {
//!     tri.insert_constraint(ids[i], ids[(i + 1) % 4])?;
//! }
//! tri.mark_domain(&[])?;
//!
//! let first = relax_step(&mut tri, 0.0)?;
//! assert!(first.max_ratio > 0.0);
//!
//! let options = LloydOptions::default().with_max_iterations(50);
//! let report = optimize(&mut tri, &options, None)?;
//! assert!(report.passes <= 50);
//! assert_ne!(report.termination, Termination::Cancelled);
//! tri.validate()?;
//! # Ok::<(), relaxum::RelaxError>(())
//! ```

mod cancel;
mod displacement;
mod optimizer;
mod options;
mod step;

pub use cancel::CancelToken;
pub use displacement::{displacement, displacement_ratio};
pub use optimizer::{optimize, LloydOptimizer, OptimizationReport, Termination};
pub use options::LloydOptions;
pub use step::{relax_step, StepReport};
