//! Material component.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use viz_backend::{Device, Handle};
use viz_scene::Component;

/// Surface material parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Material {
    /// Opaque shaded surface (backend kind `"phong"`).
    Phong {
        /// Diffuse reflectance, components in `[0, 1]`.
        diffuse: Vec3,
        /// Specular reflectance, components in `[0, 1]`.
        specular: Vec3,
        /// Specular exponent, `>= 0`.
        shininess: f32,
        /// Opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Transparent dielectric (backend kind `"thinGlass"`).
    ThinGlass {
        /// Attenuation color, components in `[0, 1]`.
        color: Vec3,
        /// Opacity in `[0, 1]`.
        opacity: f32,
        /// Index of refraction, `> 0`.
        ior: f32,
    },
}

impl Material {
    /// The backend object kind for this material.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Phong { .. } => "phong",
            Self::ThinGlass { .. } => "thinGlass",
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::Phong {
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.1),
            shininess: 10.0,
            opacity: 1.0,
        }
    }
}

/// The material applied to a model's geometry.
#[derive(Debug)]
pub struct MaterialComponent {
    /// Material parameters.
    pub material: Material,
    /// Backend handle, created on first commit.
    pub handle: Option<Handle>,
    /// Set when the material changed since the last commit.
    pub dirty: bool,
}

impl MaterialComponent {
    /// Create a material component, dirty so the first frame commits it.
    #[must_use]
    pub fn new(material: Material) -> Self {
        Self {
            material,
            handle: None,
            dirty: true,
        }
    }

    /// Replace the material and mark the component dirty.
    pub fn set(&mut self, material: Material) {
        self.material = material;
        self.dirty = true;
    }
}

impl Default for MaterialComponent {
    fn default() -> Self {
        Self::new(Material::default())
    }
}

impl Component for MaterialComponent {
    fn type_name(&self) -> &'static str {
        "Material"
    }

    fn on_destroy(&mut self, device: &dyn Device) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = device.release(handle) {
                tracing::warn!(%handle, error = %e, "failed to release material handle");
            }
        }
    }
}
