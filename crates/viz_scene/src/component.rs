//! Core [`Component`] trait.
//!
//! Any `'static` type can be a component by implementing this trait. The two
//! hooks cover the per-type behavior the scene needs without a class
//! hierarchy: bounds contribution (sync phase) and backend-handle teardown
//! (model removal). Both default to no-ops, so pure-data components only
//! supply a name.

use std::any::Any;

use glam::Mat4;
use viz_backend::Device;
use viz_math::Bounds;

/// A typed, single-instance-per-model data/behavior unit.
///
/// `Any` as a supertrait lets the type-erased store downcast back to the
/// concrete type; `Send + Sync` lets models cross the control/render
/// boundary.
pub trait Component: Any + Send + Sync {
    /// Human-readable component name, used in logs and error messages.
    fn type_name(&self) -> &'static str;

    /// World-space bounds this component contributes, given the model
    /// matrix. `None` means the component carries no geometry (lights,
    /// materials) — distinct from `Some(Bounds::EMPTY)`, which is an
    /// intentionally unbounded geometry such as a clip plane.
    fn local_bounds(&self, _matrix: Mat4) -> Option<Bounds> {
        None
    }

    /// Release any backend handles this component owns. Called by the scene
    /// exactly once, before the model is dropped. Must be idempotent on a
    /// component that owns no handle.
    fn on_destroy(&mut self, _device: &dyn Device) {}
}
