//! Renderable component types.
//!
//! Each component owns its CPU-side data, its backend handle(s), and a
//! per-frame dirty flag. Handles are created and filled by the commit-phase
//! systems through the [`adapters`](crate::adapters); the teardown hook
//! releases them when the scene removes the model.

pub mod clip;
pub mod geometry;
pub mod lights;
pub mod material;
pub mod renderable;
pub mod volume;

pub use clip::ClipPlanes;
pub use geometry::{Geometry, Plane, Primitives, Sphere};
pub use lights::{Light, Lights};
pub use material::{Material, MaterialComponent};
pub use renderable::{RenderGroup, Renderable};
pub use volume::{Volume, VolumeData};
