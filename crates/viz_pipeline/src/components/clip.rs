//! Clip-plane component.

use glam::Mat4;
use viz_backend::{Device, Handle};
use viz_math::Bounds;
use viz_scene::Component;

use super::geometry::Plane;

/// Clip planes attached to a model.
///
/// Committed as a `"plane"` object with the clipping flag set. Clip planes
/// are infinite: their bounds contribution is the empty box by design, not
/// a bug.
#[derive(Debug, Default)]
pub struct ClipPlanes {
    /// The plane list.
    pub planes: Vec<Plane>,
    /// Backend handle, created on first commit.
    pub handle: Option<Handle>,
    /// Set when the plane list changed since the last commit.
    pub dirty: bool,
}

impl ClipPlanes {
    /// Create a clip-plane component, dirty so the first frame commits it.
    #[must_use]
    pub fn new(planes: Vec<Plane>) -> Self {
        Self {
            planes,
            handle: None,
            dirty: true,
        }
    }

    /// Append a plane and mark the component dirty.
    pub fn push(&mut self, plane: Plane) {
        self.planes.push(plane);
        self.dirty = true;
    }
}

impl Component for ClipPlanes {
    fn type_name(&self) -> &'static str {
        "ClipPlanes"
    }

    fn local_bounds(&self, _matrix: Mat4) -> Option<Bounds> {
        // Unbounded geometry: participates in bounds computation but
        // contributes nothing.
        Some(Bounds::EMPTY)
    }

    fn on_destroy(&mut self, device: &dyn Device) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = device.release(handle) {
                tracing::warn!(%handle, error = %e, "failed to release clip-plane handle");
            }
        }
    }
}
