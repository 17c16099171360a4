//! Light component.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use viz_backend::{Device, Handle};
use viz_scene::Component;

/// A single light source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Light {
    /// Directional light at infinity (backend kind `"distant"`).
    Distant {
        /// Direction the light travels, model space.
        direction: Vec3,
        /// RGB color, components in `[0, 1]`.
        color: Vec3,
        /// Scalar intensity, `>= 0`.
        intensity: f32,
    },
    /// Uniform ambient term (backend kind `"ambient"`).
    Ambient {
        /// RGB color, components in `[0, 1]`.
        color: Vec3,
        /// Scalar intensity, `>= 0`.
        intensity: f32,
    },
}

impl Light {
    /// The backend object kind for this light.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Distant { .. } => "distant",
            Self::Ambient { .. } => "ambient",
        }
    }
}

/// All lights attached to one model.
///
/// One backend handle per light, parallel with `lights` after a commit.
/// Lights carry no geometry, so this component contributes no bounds.
#[derive(Debug, Default)]
pub struct Lights {
    /// The light list.
    pub lights: Vec<Light>,
    /// Backend handles, one per committed light.
    pub handles: Vec<Handle>,
    /// Set when the light list changed since the last commit.
    pub dirty: bool,
}

impl Lights {
    /// Create a lights component, dirty so the first frame commits it.
    #[must_use]
    pub fn new(lights: Vec<Light>) -> Self {
        Self {
            lights,
            handles: Vec::new(),
            dirty: true,
        }
    }

    /// Append a light and mark the component dirty.
    pub fn push(&mut self, light: Light) {
        self.lights.push(light);
        self.dirty = true;
    }
}

impl Component for Lights {
    fn type_name(&self) -> &'static str {
        "Lights"
    }

    fn on_destroy(&mut self, device: &dyn Device) {
        for handle in self.handles.drain(..) {
            if let Err(e) = device.release(handle) {
                tracing::warn!(%handle, error = %e, "failed to release light handle");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;
    use viz_backend::mock::MockDevice;

    use super::*;

    #[test]
    fn test_lights_contribute_no_bounds() {
        let lights = Lights::new(vec![Light::Ambient {
            color: Vec3::ONE,
            intensity: 1.0,
        }]);
        assert!(lights.local_bounds(Mat4::IDENTITY).is_none());
    }

    #[test]
    fn test_push_marks_dirty() {
        let mut lights = Lights::default();
        assert!(!lights.dirty);
        lights.push(Light::Distant {
            direction: -Vec3::Y,
            color: Vec3::ONE,
            intensity: 1.0,
        });
        assert!(lights.dirty);
    }

    #[test]
    fn test_on_destroy_releases_all_handles() {
        let device = MockDevice::new();
        let mut lights = Lights::new(vec![]);
        lights.handles.push(device.create("distant").unwrap());
        lights.handles.push(device.create("ambient").unwrap());
        lights.on_destroy(&device);
        assert!(device.live_handles().is_empty());
        assert!(lights.handles.is_empty());
    }

    #[test]
    fn test_light_tagged_encoding() {
        let light: Light = serde_json::from_str(
            r#"{"kind": "distant", "direction": [0.0, -1.0, 0.0], "color": [1.0, 1.0, 1.0], "intensity": 2.0}"#,
        )
        .unwrap();
        assert!(matches!(light, Light::Distant { intensity, .. } if intensity == 2.0));
    }

    #[test]
    fn test_light_kind_names() {
        let distant = Light::Distant {
            direction: -Vec3::Y,
            color: Vec3::ONE,
            intensity: 1.0,
        };
        let ambient = Light::Ambient {
            color: Vec3::ONE,
            intensity: 0.5,
        };
        assert_eq!(distant.kind(), "distant");
        assert_eq!(ambient.kind(), "ambient");
    }
}
