//! Render-object adapters.
//!
//! Per-component-type logic that maps CPU-side data to the backend's
//! committed-object protocol. Every `update` validates domain constraints
//! *before* touching the device, so a rejected value never reaches the
//! backend. `compute_bounds` functions are pure. Adapters never retain
//! handles — handles are owned by the components.

pub mod camera;
pub mod light;
pub mod material;
pub mod plane;
pub mod sphere;
pub mod volume;
