//! Planar geometry used by pass rating and tactics
//!
//! Field coordinates are meters with the origin at centre field, +x towards the
//! enemy goal.

mod angle;
mod point;
mod shapes;

pub use angle::Angle;
pub use point::{Point, Vector};
pub use shapes::{Circle, Rectangle, Segment};
