//! # viz_math
//!
//! Math types for the visualization renderer. Re-exports [`glam`] so
//! downstream crates share one vector/matrix stack, and defines the
//! engine-specific spatial types: [`Bounds`] and [`Transform`].

pub mod bounds;
pub mod transform;

pub use bounds::Bounds;
pub use transform::Transform;

pub use glam;
