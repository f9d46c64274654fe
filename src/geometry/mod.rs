//! Geometric Primitives and Operations

pub mod bezier;
pub mod bounds;
pub mod perspective;
pub mod quadrant;
pub mod simplify;
pub mod utilities;

// Re-export commonly used items
pub use bounds::{compute_bounds, compute_bounds_of, BoundingBox, Bounds};
pub use perspective::Perspective;
pub use quadrant::{FlipAxis, Quadrant};
pub use utilities::axis_lock_position;
