//! Init-phase systems.
//!
//! These establish missing derived components the first time a prerequisite
//! appears. Idempotence comes from presence checks: if the derived component
//! already exists, the system is a no-op for that model.

use viz_scene::Model;

use crate::components::{Geometry, Lights, Renderable, Volume};
use crate::error::PipelineError;
use crate::pipeline::{FrameContext, System};

/// Synthesizes a geometric [`Renderable`] for models that carry geometry or
/// volume data.
pub struct GeometryInit;

impl System for GeometryInit {
    fn name(&self) -> &'static str {
        "geometry_init"
    }

    fn execute(&self, model: &mut Model, _ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let store = model.components_mut();
        if (store.has::<Geometry>() || store.has::<Volume>()) && !store.has::<Renderable>() {
            store.add(Renderable::default());
        }
        Ok(())
    }
}

/// Synthesizes a light-only [`Renderable`] for models that carry lights but
/// no geometry-derived renderable yet.
///
/// Runs after [`GeometryInit`], so a model with both geometry and lights
/// keeps its geometric render group.
pub struct LightsInit;

impl System for LightsInit {
    fn name(&self) -> &'static str {
        "lights_init"
    }

    fn execute(&self, model: &mut Model, _ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let store = model.components_mut();
        if store.has::<Lights>() && !store.has::<Renderable>() {
            store.add(Renderable::lights_only());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use viz_backend::mock::MockDevice;
    use viz_math::Transform;
    use viz_scene::ModelId;

    use crate::components::{Light, RenderGroup, Sphere};

    use super::*;

    fn ambient() -> Light {
        Light::Ambient {
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }

    #[test]
    fn test_lights_init_synthesizes_light_only_renderable() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Lights::new(vec![ambient()]));

        let mut ctx = FrameContext::new(&device, 1);
        LightsInit.execute(&mut model, &mut ctx).unwrap();

        let renderable = model.components().get::<Renderable>();
        assert_eq!(renderable.group, RenderGroup::LightsOnly);
    }

    #[test]
    fn test_init_is_idempotent() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Lights::new(vec![ambient()]));

        let mut ctx = FrameContext::new(&device, 1);
        LightsInit.execute(&mut model, &mut ctx).unwrap();
        let first = *model.components().get::<Renderable>();

        // A second run must leave the component identical — no duplicate
        // synthesis, no overwrite.
        LightsInit.execute(&mut model, &mut ctx).unwrap();
        assert_eq!(*model.components().get::<Renderable>(), first);
        assert_eq!(model.components().len(), 2);
    }

    #[test]
    fn test_lights_init_does_not_touch_existing_renderable() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Lights::new(vec![ambient()]));
        model.components_mut().add(Renderable::default());

        let mut ctx = FrameContext::new(&device, 1);
        LightsInit.execute(&mut model, &mut ctx).unwrap();
        assert_eq!(
            model.components().get::<Renderable>().group,
            RenderGroup::Geometric
        );
    }

    #[test]
    fn test_geometry_init_wins_when_both_present() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Geometry::spheres(vec![Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        }]));
        model.components_mut().add(Lights::new(vec![ambient()]));

        let mut ctx = FrameContext::new(&device, 1);
        // Registration order: geometry first, lights second.
        GeometryInit.execute(&mut model, &mut ctx).unwrap();
        LightsInit.execute(&mut model, &mut ctx).unwrap();

        assert_eq!(
            model.components().get::<Renderable>().group,
            RenderGroup::Geometric
        );
    }
}
