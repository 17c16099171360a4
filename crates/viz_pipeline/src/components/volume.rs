//! Volume component: regular-grid scalar fields.

use glam::{Mat4, UVec3, Vec3};
use serde::{Deserialize, Serialize};
use viz_backend::{Device, Handle};
use viz_math::Bounds;
use viz_scene::Component;

use crate::adapters;

/// A regular-grid scalar field (backend kind `"structuredRegular"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeData {
    /// Grid sample counts per axis. Every axis must be non-zero.
    pub dimensions: UVec3,
    /// World-space distance between samples per axis.
    pub spacing: Vec3,
    /// Grid origin in model space.
    #[serde(default)]
    pub origin: Vec3,
    /// Scalar samples, x-fastest, `dimensions.x * y * z` values.
    pub values: Vec<f32>,
}

/// Volume attached to a model.
pub struct Volume {
    /// The grid data.
    pub data: VolumeData,
    /// Backend handle, created on first commit.
    pub handle: Option<Handle>,
    /// Model matrix at last commit, compared by the transform sync system.
    pub committed_matrix: Mat4,
    /// Set when CPU-side data changed since the last commit.
    pub dirty: bool,
}

impl Volume {
    /// Create a volume component, dirty so the first frame commits it.
    #[must_use]
    pub fn new(data: VolumeData) -> Self {
        Self {
            data,
            handle: None,
            committed_matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl Component for Volume {
    fn type_name(&self) -> &'static str {
        "Volume"
    }

    fn local_bounds(&self, matrix: Mat4) -> Option<Bounds> {
        Some(adapters::volume::compute_bounds(matrix, &self.data))
    }

    fn on_destroy(&mut self, device: &dyn Device) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = device.release(handle) {
                tracing::warn!(%handle, error = %e, "failed to release volume handle");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use viz_backend::mock::MockDevice;

    use super::*;

    fn unit_grid() -> VolumeData {
        VolumeData {
            dimensions: UVec3::new(2, 2, 2),
            spacing: Vec3::ONE,
            origin: Vec3::ZERO,
            values: vec![0.0; 8],
        }
    }

    #[test]
    fn test_new_volume_is_dirty_with_no_handle() {
        let volume = Volume::new(unit_grid());
        assert!(volume.dirty);
        assert!(volume.handle.is_none());
    }

    #[test]
    fn test_volume_bounds_span_the_grid() {
        let volume = Volume::new(unit_grid());
        let bounds = volume.local_bounds(Mat4::IDENTITY).unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::splat(2.0));
    }

    #[test]
    fn test_on_destroy_releases_handle() {
        let device = MockDevice::new();
        let mut volume = Volume::new(unit_grid());
        volume.handle = Some(device.create("structuredRegular").unwrap());
        volume.on_destroy(&device);
        assert!(device.live_handles().is_empty());
    }
}
