//! Light adapter.

use glam::Vec3;
use viz_backend::params::{ParamMap, ParamValue, Params};
use viz_backend::{Device, Handle};

use crate::components::Light;
use crate::error::AdapterError;

fn validate_color(color: Vec3) -> Result<(), AdapterError> {
    if !color.is_finite() || color.min_element() < 0.0 || color.max_element() > 1.0 {
        return Err(AdapterError::bad(
            "color",
            format!("components {color} outside [0, 1]"),
        ));
    }
    Ok(())
}

/// Validate a single light.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] for a negative intensity, an out-of-range
/// color, or a zero direction on a distant light.
pub fn validate(light: &Light) -> Result<(), AdapterError> {
    match light {
        Light::Distant {
            direction,
            color,
            intensity,
        } => {
            validate_color(*color)?;
            if !intensity.is_finite() || *intensity < 0.0 {
                return Err(AdapterError::bad("intensity", format!("{intensity}, expected >= 0")));
            }
            if direction.length_squared() == 0.0 {
                return Err(AdapterError::bad("direction", "zero direction"));
            }
            Ok(())
        }
        Light::Ambient { color, intensity } => {
            validate_color(*color)?;
            if !intensity.is_finite() || *intensity < 0.0 {
                return Err(AdapterError::bad("intensity", format!("{intensity}, expected >= 0")));
            }
            Ok(())
        }
    }
}

fn params(light: &Light) -> ParamMap {
    match light {
        Light::Distant {
            direction,
            color,
            intensity,
        } => Params::new()
            .set("direction", ParamValue::Vec3(direction.normalize()))
            .set("color", ParamValue::Vec3(*color))
            .set("intensity", ParamValue::Float(*intensity))
            .build(),
        Light::Ambient { color, intensity } => Params::new()
            .set("color", ParamValue::Vec3(*color))
            .set("intensity", ParamValue::Float(*intensity))
            .build(),
    }
}

/// Push one light's parameters into the backend object and commit it.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] on validation failure (before any device
/// call), or a device error from `set_params`/`commit`.
pub fn update(device: &dyn Device, handle: Handle, light: &Light) -> Result<(), AdapterError> {
    validate(light)?;
    device.set_params(handle, params(light))?;
    device.commit(handle)?;
    Ok(())
}
