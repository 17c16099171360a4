//! Model transform.
//!
//! [`Transform`] carries the translation, rotation, and scale of a scene
//! model and derives the 4x4 affine matrix applied to all of the model's
//! geometry when computing world-space bounds or committing to the backend.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation, rotation (unit quaternion), and per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// World-space translation.
    #[serde(default)]
    pub translation: Vec3,
    /// Rotation as a unit quaternion.
    #[serde(default)]
    pub rotation: Quat,
    /// Per-axis scale factor.
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform with the given translation and default
    /// rotation/scale.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Compute the 4x4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform::IDENTITY;
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translation_roundtrip_through_matrix() {
        // Transform(translation=(1,2,3), identity rotation, unit scale)
        // applied to the origin must yield (1,2,3).
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = t.to_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_componentwise_equality() {
        let a = Transform::from_translation(Vec3::X);
        let b = Transform::from_translation(Vec3::X);
        assert_eq!(a, b);
        assert_ne!(a, Transform::IDENTITY);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let t: Transform = serde_json::from_str(r#"{"translation": [1.0, 2.0, 3.0]}"#).unwrap();
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }
}
