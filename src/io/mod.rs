//! Reading and writing meshes in a whitespace-separated text format.
//!
//! # Input layout
//!
//! Whitespace-separated tokens:
//!
//! ```text
//! numPoints
//! x y            (numPoints times)
//! numBoundaries
//! a b            (numBoundaries times, point indices joined by a constraint)
//! numSeeds
//! s              (numSeeds times, index of a point inside a hole)
//! ```
//!
//! A count missing at the end of the input reads as zero, so files without a
//! seed section are accepted.
//!
//! # Output layout
//!
//! ```text
//! numPoints numFaces 2
//! x y            (one line per vertex)
//!
//! i j k          (one line per triangle, counter-clockwise)
//! ```
//!
//! Numbers are written with six significant digits in `%g` style.

mod format;
mod mesh;

pub use mesh::{load_mesh, read_mesh, save_mesh, write_mesh, write_mesh_edges, MeshData};
