//! Commit-phase systems.
//!
//! Each one pushes *changed* component state to the backend through the
//! adapters, then clears the component's dirty flag. Clean components cost
//! nothing. Any push flips `ctx.committed` so the engine knows the backend
//! world needs a re-commit.

use viz_scene::Model;

use crate::adapters;
use crate::components::{ClipPlanes, Geometry, Lights, MaterialComponent, Primitives, Volume};
use crate::error::PipelineError;
use crate::pipeline::{FrameContext, System};

/// Commits dirty geometry.
pub struct GeometryCommit;

impl System for GeometryCommit {
    fn name(&self) -> &'static str {
        "geometry_commit"
    }

    fn execute(&self, model: &mut Model, ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let matrix = model.transform().to_matrix();
        let Some(geometry) = model.components_mut().find_mut::<Geometry>() else {
            return Ok(());
        };
        if !geometry.dirty {
            return Ok(());
        }

        // Validate before any backend object exists, so a bad primitive list
        // never leaks a handle.
        match &geometry.primitives {
            Primitives::Spheres(spheres) => adapters::sphere::validate(spheres)?,
            Primitives::Planes(planes) => adapters::plane::validate(planes)?,
        }

        let handle = match geometry.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx
                    .device
                    .create(geometry.primitives.kind())
                    .map_err(PipelineError::Device)?;
                geometry.handle = Some(handle);
                handle
            }
        };

        match &geometry.primitives {
            Primitives::Spheres(spheres) => {
                adapters::sphere::update(ctx.device, handle, spheres, &geometry.colors, matrix)?;
            }
            Primitives::Planes(planes) => {
                adapters::plane::update(ctx.device, handle, planes, false)?;
            }
        }

        geometry.committed_matrix = matrix;
        geometry.dirty = false;
        ctx.committed = true;
        Ok(())
    }
}

/// Commits dirty volumes.
pub struct VolumeCommit;

impl System for VolumeCommit {
    fn name(&self) -> &'static str {
        "volume_commit"
    }

    fn execute(&self, model: &mut Model, ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let matrix = model.transform().to_matrix();
        let Some(volume) = model.components_mut().find_mut::<Volume>() else {
            return Ok(());
        };
        if !volume.dirty {
            return Ok(());
        }

        adapters::volume::validate(&volume.data)?;

        let handle = match volume.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx
                    .device
                    .create("structuredRegular")
                    .map_err(PipelineError::Device)?;
                volume.handle = Some(handle);
                handle
            }
        };

        adapters::volume::update(ctx.device, handle, &volume.data, matrix)?;
        volume.committed_matrix = matrix;
        volume.dirty = false;
        ctx.committed = true;
        Ok(())
    }
}

/// Commits dirty materials.
pub struct MaterialCommit;

impl System for MaterialCommit {
    fn name(&self) -> &'static str {
        "material_commit"
    }

    fn execute(&self, model: &mut Model, ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let Some(component) = model.components_mut().find_mut::<MaterialComponent>() else {
            return Ok(());
        };
        if !component.dirty {
            return Ok(());
        }

        adapters::material::validate(&component.material)?;

        // A material kind change needs a fresh backend object.
        let handle = match component.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx
                    .device
                    .create(component.material.kind())
                    .map_err(PipelineError::Device)?;
                component.handle = Some(handle);
                handle
            }
        };

        adapters::material::update(ctx.device, handle, &component.material)?;
        component.dirty = false;
        ctx.committed = true;
        Ok(())
    }
}

/// Commits dirty light lists.
///
/// Lights are recreated wholesale on change: release the old handles, create
/// one object per light, push parameters, commit.
pub struct LightCommit;

impl System for LightCommit {
    fn name(&self) -> &'static str {
        "light_commit"
    }

    fn execute(&self, model: &mut Model, ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let Some(lights) = model.components_mut().find_mut::<Lights>() else {
            return Ok(());
        };
        if !lights.dirty {
            return Ok(());
        }

        // Validate the whole list before touching any backend object, so a
        // bad light leaves the previous committed state intact.
        for light in &lights.lights {
            adapters::light::validate(light)?;
        }

        for handle in lights.handles.drain(..) {
            ctx.device.release(handle).map_err(PipelineError::Device)?;
        }
        for light in &lights.lights {
            let handle = ctx
                .device
                .create(light.kind())
                .map_err(PipelineError::Device)?;
            adapters::light::update(ctx.device, handle, light)?;
            lights.handles.push(handle);
        }

        lights.dirty = false;
        ctx.committed = true;
        Ok(())
    }
}

/// Commits dirty clip-plane sets.
pub struct ClipPlaneCommit;

impl System for ClipPlaneCommit {
    fn name(&self) -> &'static str {
        "clip_plane_commit"
    }

    fn execute(&self, model: &mut Model, ctx: &mut FrameContext<'_>) -> Result<(), PipelineError> {
        let Some(clip) = model.components_mut().find_mut::<ClipPlanes>() else {
            return Ok(());
        };
        if !clip.dirty {
            return Ok(());
        }

        adapters::plane::validate(&clip.planes)?;

        let handle = match clip.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx.device.create("plane").map_err(PipelineError::Device)?;
                clip.handle = Some(handle);
                handle
            }
        };

        adapters::plane::update(ctx.device, handle, &clip.planes, true)?;
        clip.dirty = false;
        ctx.committed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use viz_backend::mock::{DeviceCall, MockDevice};
    use viz_math::Transform;
    use viz_scene::ModelId;

    use crate::components::{Light, Material, Sphere};

    use super::*;

    fn sphere_model() -> Model {
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        let mut geometry = Geometry::spheres(vec![Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        }]);
        geometry.colors = vec![Geometry::DEFAULT_COLOR];
        model.components_mut().add(geometry);
        model
    }

    #[test]
    fn test_geometry_commit_creates_and_commits_handle() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        let mut ctx = FrameContext::new(&device, 1);
        GeometryCommit.execute(&mut model, &mut ctx).unwrap();

        let geometry = model.components().get::<Geometry>();
        assert!(geometry.handle.is_some());
        assert!(!geometry.dirty);
        assert!(ctx.committed);
        assert!(matches!(device.calls()[0], DeviceCall::Create { ref kind, .. } if kind == "sphere"));
    }

    #[test]
    fn test_clean_geometry_is_skipped() {
        let device = MockDevice::new();
        let mut model = sphere_model();
        let mut ctx = FrameContext::new(&device, 1);
        GeometryCommit.execute(&mut model, &mut ctx).unwrap();
        let calls_after_first = device.call_count();

        let mut ctx = FrameContext::new(&device, 2);
        GeometryCommit.execute(&mut model, &mut ctx).unwrap();
        assert_eq!(device.call_count(), calls_after_first);
        assert!(!ctx.committed);
    }

    #[test]
    fn test_invalid_geometry_rejected_before_any_device_call() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        let mut geometry = Geometry::spheres(vec![Sphere {
            center: Vec3::ZERO,
            radius: -1.0,
        }]);
        geometry.colors = vec![Geometry::DEFAULT_COLOR];
        model.components_mut().add(geometry);

        let mut ctx = FrameContext::new(&device, 1);
        assert!(GeometryCommit.execute(&mut model, &mut ctx).is_err());
        assert_eq!(device.call_count(), 0);
        assert!(model.components().get::<Geometry>().handle.is_none());
        assert!(!ctx.committed);
    }

    #[test]
    fn test_invalid_volume_rejected_before_any_device_call() {
        use glam::UVec3;

        use crate::components::VolumeData;

        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Volume::new(VolumeData {
            dimensions: UVec3::new(2, 2, 2),
            spacing: Vec3::ONE,
            origin: Vec3::ZERO,
            values: vec![0.0; 7],
        }));

        let mut ctx = FrameContext::new(&device, 1);
        assert!(VolumeCommit.execute(&mut model, &mut ctx).is_err());
        assert_eq!(device.call_count(), 0);
        assert!(model.components().get::<Volume>().handle.is_none());
    }

    #[test]
    fn test_invalid_material_rejected_before_any_device_call() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model
            .components_mut()
            .add(MaterialComponent::new(Material::ThinGlass {
                color: Vec3::ONE,
                opacity: 2.0,
                ior: 1.5,
            }));

        let mut ctx = FrameContext::new(&device, 1);
        assert!(MaterialCommit.execute(&mut model, &mut ctx).is_err());
        assert_eq!(device.call_count(), 0);
        assert!(model.components().get::<MaterialComponent>().handle.is_none());
    }

    #[test]
    fn test_volume_commit_creates_structured_grid() {
        use glam::UVec3;

        use crate::components::VolumeData;

        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Volume::new(VolumeData {
            dimensions: UVec3::new(2, 2, 2),
            spacing: Vec3::ONE,
            origin: Vec3::ZERO,
            values: vec![0.0; 8],
        }));

        let mut ctx = FrameContext::new(&device, 1);
        VolumeCommit.execute(&mut model, &mut ctx).unwrap();

        let volume = model.components().get::<Volume>();
        assert!(volume.handle.is_some());
        assert!(!volume.dirty);
        assert!(ctx.committed);
        assert!(
            matches!(device.calls()[0], DeviceCall::Create { ref kind, .. } if kind == "structuredRegular")
        );
    }

    #[test]
    fn test_material_commit_uses_kind_name() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model
            .components_mut()
            .add(MaterialComponent::new(Material::ThinGlass {
                color: Vec3::ONE,
                opacity: 0.3,
                ior: 1.5,
            }));

        let mut ctx = FrameContext::new(&device, 1);
        MaterialCommit.execute(&mut model, &mut ctx).unwrap();
        assert!(
            matches!(device.calls()[0], DeviceCall::Create { ref kind, .. } if kind == "thinGlass")
        );
    }

    #[test]
    fn test_light_commit_creates_one_object_per_light() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Lights::new(vec![
            Light::Distant {
                direction: -Vec3::Y,
                color: Vec3::ONE,
                intensity: 1.0,
            },
            Light::Ambient {
                color: Vec3::ONE,
                intensity: 0.2,
            },
        ]));

        let mut ctx = FrameContext::new(&device, 1);
        LightCommit.execute(&mut model, &mut ctx).unwrap();

        let lights = model.components().get::<Lights>();
        assert_eq!(lights.handles.len(), 2);
        assert!(!lights.dirty);
    }

    #[test]
    fn test_light_recommit_releases_old_handles() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Lights::new(vec![Light::Ambient {
            color: Vec3::ONE,
            intensity: 0.2,
        }]));

        let mut ctx = FrameContext::new(&device, 1);
        LightCommit.execute(&mut model, &mut ctx).unwrap();
        let first = model.components().get::<Lights>().handles.clone();

        model.components_mut().get_mut::<Lights>().push(Light::Distant {
            direction: -Vec3::Y,
            color: Vec3::ONE,
            intensity: 1.0,
        });
        let mut ctx = FrameContext::new(&device, 2);
        LightCommit.execute(&mut model, &mut ctx).unwrap();

        let live = device.live_handles();
        assert_eq!(live.len(), 2);
        assert!(!live.contains(&first[0]));
    }

    #[test]
    fn test_bad_light_rejected_before_releasing_handles() {
        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model.components_mut().add(Lights::new(vec![Light::Ambient {
            color: Vec3::ONE,
            intensity: 0.2,
        }]));

        let mut ctx = FrameContext::new(&device, 1);
        LightCommit.execute(&mut model, &mut ctx).unwrap();

        model.components_mut().get_mut::<Lights>().push(Light::Ambient {
            color: Vec3::ONE,
            intensity: -5.0,
        });
        let mut ctx = FrameContext::new(&device, 2);
        assert!(LightCommit.execute(&mut model, &mut ctx).is_err());
        // The previously committed light survived the rejected update.
        assert_eq!(device.live_handles().len(), 1);
    }

    #[test]
    fn test_clip_plane_commit_marks_clipping() {
        use glam::Vec4;

        let device = MockDevice::new();
        let mut model = Model::new(ModelId(0), Transform::IDENTITY);
        model
            .components_mut()
            .add(ClipPlanes::new(vec![crate::components::Plane {
                coefficients: Vec4::new(1.0, 0.0, 0.0, 0.0),
            }]));

        let mut ctx = FrameContext::new(&device, 1);
        ClipPlaneCommit.execute(&mut model, &mut ctx).unwrap();

        let calls = device.calls();
        let params = calls
            .iter()
            .find_map(|c| match c {
                DeviceCall::SetParams { params, .. } => Some(params),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            params["clipping"],
            viz_backend::params::ParamValue::Bool(true)
        );
    }
}
