//! Polygon area, centroid and clipping.
//!
//! Voronoi cells are built as convex polygons and then reduced to their area
//! centroid, which is where a Lloyd step moves the generating vertex.
//!
//! # Example
//!
//! ```
//! use relaxum::polygon::{clip_half_plane, polygon_centroid};
//! use relaxum::Point2;
//!
//! let square = vec![
//!     Point2::new(0.0_f64, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! // Cut away everything right of x = 1.
//! let half = clip_half_plane(&square, Point2::new(1.0, 0.0), Point2::new(1.0, 2.0));
//! let c = polygon_centroid(&half).unwrap();
//! assert!((c.x - 0.5).abs() < 1e-12);
//! assert!((c.y - 1.0).abs() < 1e-12);
//! ```

mod clip;
mod core;

pub use clip::clip_half_plane;
pub use core::{polygon_centroid, polygon_signed_area};
