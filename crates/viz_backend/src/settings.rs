//! Render settings passed to the device on each frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Projection {
    /// Pinhole perspective projection with a vertical field of view in
    /// degrees.
    Perspective {
        /// Vertical field of view, degrees.
        fov_y: f32,
    },
    /// Orthographic projection. `height` is the world-space height of the
    /// view volume and must be strictly positive.
    Orthographic {
        /// World-space height of the view volume.
        height: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Self::Perspective { fov_y: 45.0 }
    }
}

/// Camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position.
    #[serde(default)]
    pub position: Vec3,
    /// Look-at target.
    #[serde(default)]
    pub target: Vec3,
    /// Up vector.
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// Projection parameters.
    #[serde(default)]
    pub projection: Projection,
}

fn default_up() -> Vec3 {
    Vec3::Y
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::default(),
        }
    }
}

/// Everything the device needs to produce one framebuffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Camera for this frame.
    #[serde(default)]
    pub camera: Camera,
    /// Samples per pixel.
    #[serde(default = "default_samples")]
    pub samples_per_pixel: u32,
}

fn default_samples() -> u32 {
    1
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            camera: Camera::default(),
            samples_per_pixel: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projection_is_perspective() {
        assert_eq!(Projection::default(), Projection::Perspective { fov_y: 45.0 });
    }

    #[test]
    fn test_camera_deserialize_with_defaults() {
        let cam: Camera = serde_json::from_str(r#"{"position": [0.0, 0.0, 5.0]}"#).unwrap();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.up, Vec3::Y);
    }

    #[test]
    fn test_projection_tagged_encoding() {
        let p: Projection =
            serde_json::from_str(r#"{"kind": "orthographic", "height": 2.0}"#).unwrap();
        assert_eq!(p, Projection::Orthographic { height: 2.0 });
    }
}
