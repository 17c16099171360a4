//! Geometry component: primitive lists plus derived color data.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use viz_backend::{Device, Handle};
use viz_math::Bounds;
use viz_scene::Component;

use crate::adapters;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Center in model space.
    pub center: Vec3,
    /// Radius. Must be strictly positive; validated by the sphere adapter
    /// before anything reaches the backend.
    pub radius: f32,
}

/// An infinite plane, `ax + by + cz + d = 0` as `(a, b, c, d)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Plane equation coefficients.
    pub coefficients: Vec4,
}

/// The primitive list carried by one geometry component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitives {
    /// Sphere list (point clouds, somas, markers).
    Spheres(Vec<Sphere>),
    /// Infinite planes. Unbounded by design: they contribute the empty
    /// bounds.
    Planes(Vec<Plane>),
}

impl Primitives {
    /// Number of primitives in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Spheres(s) => s.len(),
            Self::Planes(p) => p.len(),
        }
    }

    /// Is the list empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The backend object kind for this primitive list.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spheres(_) => "sphere",
            Self::Planes(_) => "plane",
        }
    }
}

/// Geometry attached to a model.
///
/// `colors` is derived state: the sync phase fills it from `color_map` when
/// one is present, otherwise with `base_color` repeated per element.
pub struct Geometry {
    /// The primitive list.
    pub primitives: Primitives,
    /// Solid color used when no explicit per-element map is set. RGBA,
    /// components in `[0, 1]`.
    pub base_color: Vec4,
    /// Optional explicit per-element color map.
    pub color_map: Option<Vec<Vec4>>,
    /// Derived per-element colors, maintained by the color sync system.
    pub colors: Vec<Vec4>,
    /// Backend handle, created on first commit.
    pub handle: Option<Handle>,
    /// Model matrix at last commit; the transform sync system compares it
    /// against the current matrix to re-dirty the component.
    pub committed_matrix: Mat4,
    /// Set when CPU-side data changed since the last commit.
    pub dirty: bool,
}

impl Geometry {
    /// White, fully opaque.
    pub const DEFAULT_COLOR: Vec4 = Vec4::ONE;

    /// Create a geometry component, dirty so the first frame commits it.
    #[must_use]
    pub fn new(primitives: Primitives) -> Self {
        Self {
            primitives,
            base_color: Self::DEFAULT_COLOR,
            color_map: None,
            colors: Vec::new(),
            handle: None,
            committed_matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }

    /// Create a sphere-list geometry.
    #[must_use]
    pub fn spheres(spheres: Vec<Sphere>) -> Self {
        Self::new(Primitives::Spheres(spheres))
    }

    /// Create a plane-list geometry.
    #[must_use]
    pub fn planes(planes: Vec<Plane>) -> Self {
        Self::new(Primitives::Planes(planes))
    }
}

impl Component for Geometry {
    fn type_name(&self) -> &'static str {
        "Geometry"
    }

    fn local_bounds(&self, matrix: Mat4) -> Option<Bounds> {
        let bounds = match &self.primitives {
            Primitives::Spheres(spheres) => adapters::sphere::compute_bounds(matrix, spheres),
            // Infinite planes are unbounded on purpose.
            Primitives::Planes(planes) => adapters::plane::compute_bounds(matrix, planes),
        };
        Some(bounds)
    }

    fn on_destroy(&mut self, device: &dyn Device) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = device.release(handle) {
                tracing::warn!(%handle, error = %e, "failed to release geometry handle");
            }
        }
    }
}
