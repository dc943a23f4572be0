//! Error types for relaxum operations.

use thiserror::Error;

/// Result type alias using [`RelaxError`].
pub type Result<T> = std::result::Result<T, RelaxError>;

/// Errors that can occur while building or relaxing a triangulation.
#[derive(Debug, Error)]
pub enum RelaxError {
    /// A point has a NaN or infinite coordinate.
    #[error("point has non-finite coordinates")]
    NonFinitePoint,

    /// A point lies outside the region the triangulation was built for.
    #[error("point lies outside the triangulation bounds")]
    OutOfBounds,

    /// A handle or input index does not name a vertex.
    #[error("unknown vertex {vertex}")]
    UnknownVertex {
        /// The offending index.
        vertex: usize,
    },

    /// A constraint was requested between a vertex and itself.
    #[error("constraint from vertex {vertex} to itself")]
    DegenerateConstraint {
        /// The repeated vertex.
        vertex: usize,
    },

    /// A new constraint would cross an existing one.
    #[error("constraint ({a}, {b}) crosses an existing constraint")]
    ConstraintIntersection {
        /// First endpoint of the rejected constraint.
        a: usize,
        /// Second endpoint of the rejected constraint.
        b: usize,
    },

    /// A seed point sits on a constraint, so the region it marks is ambiguous.
    #[error("seed point ({x}, {y}) lies on a constraint")]
    AmbiguousSeed {
        /// Seed x coordinate.
        x: f64,
        /// Seed y coordinate.
        y: f64,
    },

    /// Attempt to relocate a vertex that must never move.
    #[error("vertex {vertex} is constrained and cannot be relocated")]
    ConstrainedVertex {
        /// The constrained vertex.
        vertex: usize,
    },

    /// Collinear or otherwise ill-conditioned geometry around a vertex.
    #[error("degenerate geometry around vertex {vertex}")]
    DegenerateGeometry {
        /// The vertex whose neighbourhood is degenerate.
        vertex: usize,
    },

    /// Internal consistency check failed.
    #[error("invalid triangulation: {0}")]
    InvalidTriangulation(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// Malformed mesh text.
    #[error("parse error at token {token}: {message}")]
    Parse {
        /// Zero-based index of the offending token.
        token: usize,
        /// What went wrong.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelaxError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        RelaxError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns true for errors the relaxation loop recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RelaxError::DegenerateGeometry { .. })
    }
}
