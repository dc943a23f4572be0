//! Floating-point planar primitives.

mod point2;
mod vec2;

pub use point2::Point2;
pub use vec2::Vec2;
