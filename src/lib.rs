//! relaxum - Lloyd relaxation of constrained Delaunay meshes
//!
//! Smooths a planar triangle mesh by moving each free vertex to the centroid
//! of its Voronoi cell, pass after pass, while constraint edges and their
//! endpoints stay fixed. The triangulation is repaired after every move, so
//! it is a valid constrained Delaunay triangulation whenever control returns
//! to the caller.
//!
//! # Example
//!
//! ```
//! use relaxum::{optimize, LloydOptions, Point2, Triangulation};
//!
//! let points = [
//!     Point2::new(0.0_f64, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(0.2, 0.3),
//!     Point2::new(0.6, 0.7),
//! ];
//! let (mut tri, ids) = Triangulation::from_points(&points)?;
//! for i in 0..4 {
//!     tri.insert_constraint(ids[i], ids[(i + 1) % 4])?;
//! }
//! tri.mark_domain(&[])?;
//!
//! let options = LloydOptions::default()
//!     .with_max_iterations(100)
//!     .with_convergence_ratio(0.001);
//! let report = optimize(&mut tri, &options, None)?;
//!
//! assert!(report.passes <= 100);
//! assert_eq!(tri.point(ids[0]), Point2::new(0.0, 0.0));
//! tri.validate()?;
//! # Ok::<(), relaxum::RelaxError>(())
//! ```

pub mod error;
pub mod io;
pub mod lloyd;
pub mod polygon;
pub mod primitives;
pub mod tolerance;
pub mod triangulation;

pub use error::{RelaxError, Result};
pub use lloyd::{
    optimize, relax_step, CancelToken, LloydOptimizer, LloydOptions, OptimizationReport, StepReport,
    Termination,
};
pub use primitives::{Point2, Vec2};
pub use triangulation::{voronoi_cell, Relocation, TriangleId, Triangulation, VertexId, VoronoiCell};
