//! Material adapter.

use glam::Vec3;
use viz_backend::params::{ParamMap, ParamValue, Params};
use viz_backend::{Device, Handle};

use crate::components::Material;
use crate::error::AdapterError;

fn check_unit_range(name: &'static str, value: f32) -> Result<(), AdapterError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AdapterError::bad(name, format!("{value}, expected in [0, 1]")));
    }
    Ok(())
}

fn check_color(name: &'static str, color: Vec3) -> Result<(), AdapterError> {
    if !color.is_finite() || color.min_element() < 0.0 || color.max_element() > 1.0 {
        return Err(AdapterError::bad(name, format!("components {color} outside [0, 1]")));
    }
    Ok(())
}

/// Validate a material.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] for an out-of-range opacity or color, a
/// negative shininess, or a non-positive index of refraction.
pub fn validate(material: &Material) -> Result<(), AdapterError> {
    match material {
        Material::Phong {
            diffuse,
            specular,
            shininess,
            opacity,
        } => {
            check_color("diffuse", *diffuse)?;
            check_color("specular", *specular)?;
            check_unit_range("opacity", *opacity)?;
            if !shininess.is_finite() || *shininess < 0.0 {
                return Err(AdapterError::bad("shininess", format!("{shininess}, expected >= 0")));
            }
            Ok(())
        }
        Material::ThinGlass { color, opacity, ior } => {
            check_color("color", *color)?;
            check_unit_range("opacity", *opacity)?;
            if !ior.is_finite() || *ior <= 0.0 {
                return Err(AdapterError::bad("ior", format!("{ior}, expected > 0")));
            }
            Ok(())
        }
    }
}

fn params(material: &Material) -> ParamMap {
    match material {
        Material::Phong {
            diffuse,
            specular,
            shininess,
            opacity,
        } => Params::new()
            .set("kd", ParamValue::Vec3(*diffuse))
            .set("ks", ParamValue::Vec3(*specular))
            .set("ns", ParamValue::Float(*shininess))
            .set("opacity", ParamValue::Float(*opacity))
            .build(),
        Material::ThinGlass { color, opacity, ior } => Params::new()
            .set("attenuationColor", ParamValue::Vec3(*color))
            .set("opacity", ParamValue::Float(*opacity))
            .set("eta", ParamValue::Float(*ior))
            .build(),
    }
}

/// Push the material's parameters into the backend object and commit it.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] on validation failure (before any device
/// call), or a device error from `set_params`/`commit`.
pub fn update(device: &dyn Device, handle: Handle, material: &Material) -> Result<(), AdapterError> {
    validate(material)?;
    device.set_params(handle, params(material))?;
    device.commit(handle)?;
    Ok(())
}
