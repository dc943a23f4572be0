//! Tolerance-aware geometric predicates.
//!
//! Every predicate derives its tolerance from a bound on its own
//! floating-point rounding error, which keeps it meaningful at any coordinate
//! scale.

mod predicates;

pub use predicates::{
    circumcenter, in_circumcircle, incircle_det, orientation, segments_touch, Orientation,
};
