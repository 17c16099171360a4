//! # viz_scene
//!
//! The live scene graph. A [`Scene`](scene::Scene) owns a set of
//! [`Model`](model::Model)s; each model owns a type-indexed
//! [`ComponentStore`](store::ComponentStore) of heterogeneous components plus
//! a transform and derived world-space bounds. Model identity comes from a
//! recycling [`IdAllocator`](id::IdAllocator).
//!
//! The scene is the single shared mutable resource between the control path
//! and the render path — callers serialize access to it (the server wraps it
//! in a mutex). Individual component stores are owned by exactly one model
//! and never shared across models.

pub mod component;
pub mod error;
pub mod id;
pub mod model;
pub mod scene;
pub mod store;

pub use component::Component;
pub use error::SceneError;
pub use id::{IdAllocator, ModelId};
pub use model::Model;
pub use scene::Scene;
pub use store::ComponentStore;
