//! Sync-phase systems.
//!
//! These reconcile component-level CPU state with derived state before the
//! commit phase runs: transform changes re-dirty geometry, color lists are
//! materialized, and model bounds are recomputed.

use tracing::warn;
use viz_scene::Model;

use crate::components::{Geometry, Volume};
use crate::error::PipelineError;
use crate::pipeline::{FrameContext, System};

/// Re-dirties geometry and volumes whose model matrix changed since their
/// last commit.
///
/// Runs before the commit phase so a transform-only mutation still reaches
/// the backend.
pub struct TransformSync;

impl System for TransformSync {
    fn name(&self) -> &'static str {
        "transform_sync"
    }

    fn execute(&self, model: &mut Model, _ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let matrix = model.transform().to_matrix();
        if let Some(geometry) = model.components_mut().find_mut::<Geometry>() {
            if geometry.committed_matrix != matrix {
                geometry.dirty = true;
            }
        }
        if let Some(volume) = model.components_mut().find_mut::<Volume>() {
            if volume.committed_matrix != matrix {
                volume.dirty = true;
            }
        }
        Ok(())
    }
}

/// Materializes the per-element color list.
///
/// An explicit color map wins when its length matches the element count;
/// otherwise every element gets the geometry's base color. Idempotent: a
/// list already matching the element count and source is left alone.
pub struct ColorSync;

impl System for ColorSync {
    fn name(&self) -> &'static str {
        "color_sync"
    }

    fn execute(&self, model: &mut Model, _ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let Some(geometry) = model.components_mut().find_mut::<Geometry>() else {
            return Ok(());
        };

        let count = geometry.primitives.len();
        let desired = match &geometry.color_map {
            Some(map) if map.len() == count => map.clone(),
            Some(map) => {
                warn!(
                    map_len = map.len(),
                    primitives = count,
                    "color map length mismatch, falling back to base color"
                );
                vec![geometry.base_color; count]
            }
            None => vec![geometry.base_color; count],
        };
        if geometry.colors != desired {
            geometry.colors = desired;
            geometry.dirty = true;
        }
        Ok(())
    }
}

/// Recomputes the model's world-space bounds.
///
/// Runs every frame so bounds are never stale after a committed frame.
pub struct BoundsSync;

impl System for BoundsSync {
    fn name(&self) -> &'static str {
        "bounds_sync"
    }

    fn execute(&self, model: &mut Model, _ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        model.compute_bounds();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};
    use viz_backend::mock::MockDevice;
    use viz_math::Transform;
    use viz_scene::ModelId;

    use crate::components::Sphere;

    use super::*;

    fn sphere_model() -> Model {
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Geometry::spheres(vec![
            Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            Sphere {
                center: Vec3::X,
                radius: 0.5,
            },
        ]));
        model
    }

    #[test]
    fn test_color_sync_defaults_to_base_color() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        let mut ctx = FrameContext::new(&device, 1);
        ColorSync.execute(&mut model, &mut ctx).unwrap();

        let geometry = model.components().get::<Geometry>();
        assert_eq!(geometry.colors, vec![Geometry::DEFAULT_COLOR; 2]);
    }

    #[test]
    fn test_color_sync_prefers_explicit_map() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        let map = vec![Vec4::X, Vec4::Y];
        model.components_mut().get_mut::<Geometry>().color_map = Some(map.clone());

        let mut ctx = FrameContext::new(&device, 1);
        ColorSync.execute(&mut model, &mut ctx).unwrap();
        assert_eq!(model.components().get::<Geometry>().colors, map);
    }

    #[test]
    fn test_color_sync_ignores_mismatched_map() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        // One color for two spheres: wrong size, must not ship as-is.
        model.components_mut().get_mut::<Geometry>().color_map = Some(vec![Vec4::X]);

        let mut ctx = FrameContext::new(&device, 1);
        ColorSync.execute(&mut model, &mut ctx).unwrap();

        let geometry = model.components().get::<Geometry>();
        assert_eq!(geometry.colors, vec![Geometry::DEFAULT_COLOR; 2]);
    }

    #[test]
    fn test_color_sync_is_idempotent() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        let mut ctx = FrameContext::new(&device, 1);
        ColorSync.execute(&mut model, &mut ctx).unwrap();
        model.components_mut().get_mut::<Geometry>().dirty = false;

        // Second run with unchanged inputs must not re-dirty.
        ColorSync.execute(&mut model, &mut ctx).unwrap();
        assert!(!model.components().get::<Geometry>().dirty);
    }

    #[test]
    fn test_transform_sync_redirties_on_matrix_change() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        {
            let geometry = model.components_mut().get_mut::<Geometry>();
            geometry.dirty = false;
            geometry.committed_matrix = Transform::IDENTITY.to_matrix();
        }

        let mut ctx = FrameContext::new(&device, 1);
        TransformSync.execute(&mut model, &mut ctx).unwrap();
        assert!(!model.components().get::<Geometry>().dirty);

        model.set_transform(Transform::from_translation(Vec3::Y));
        TransformSync.execute(&mut model, &mut ctx).unwrap();
        assert!(model.components().get::<Geometry>().dirty);
    }

    #[test]
    fn test_bounds_sync_updates_model_bounds() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        let mut ctx = FrameContext::new(&device, 1);
        BoundsSync.execute(&mut model, &mut ctx).unwrap();

        let bounds = model.bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.5, 1.0, 1.0));
    }
}
