//! Sphere geometry adapter.
//!
//! Backend layout: positions and radii packed into a flat float buffer as
//! `[cx, cy, cz, r]` per sphere, per-element colors as a Vec4 buffer, and
//! the model matrix as a 16-float column-major buffer.

use glam::{Mat4, Vec3, Vec4};
use viz_backend::params::{ParamValue, Params};
use viz_backend::{Device, Handle};
use viz_math::Bounds;

use crate::components::Sphere;
use crate::error::AdapterError;

/// Validate a sphere list.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] for a non-positive or non-finite radius or
/// a non-finite center.
pub fn validate(spheres: &[Sphere]) -> Result<(), AdapterError> {
    for (index, sphere) in spheres.iter().enumerate() {
        if !sphere.radius.is_finite() || sphere.radius <= 0.0 {
            return Err(AdapterError::bad(
                "radius",
                format!("sphere {index} has radius {}, expected > 0", sphere.radius),
            ));
        }
        if !sphere.center.is_finite() {
            return Err(AdapterError::bad(
                "center",
                format!("sphere {index} has a non-finite center"),
            ));
        }
    }
    Ok(())
}

/// Push the full sphere list into the backend object and commit it.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] on validation failure (before any device
/// call), or a device error from `set_params`/`commit`.
pub fn update(
    device: &dyn Device,
    handle: Handle,
    spheres: &[Sphere],
    colors: &[Vec4],
    matrix: Mat4,
) -> Result<(), AdapterError> {
    validate(spheres)?;

    let mut data = Vec::with_capacity(spheres.len() * 4);
    for sphere in spheres {
        data.extend_from_slice(&[sphere.center.x, sphere.center.y, sphere.center.z]);
        data.push(sphere.radius);
    }

    let params = Params::new()
        .set("sphere.data", ParamValue::FloatBuffer(data))
        .set("color", ParamValue::Vec4Buffer(colors.to_vec()))
        .set(
            "transform",
            ParamValue::FloatBuffer(matrix.to_cols_array().to_vec()),
        )
        .build();

    device.set_params(handle, params)?;
    device.commit(handle)?;
    Ok(())
}

/// World-space bounds of a sphere list under the model matrix.
///
/// Pure function; an empty list yields the empty bounds.
#[must_use]
pub fn compute_bounds(matrix: Mat4, spheres: &[Sphere]) -> Bounds {
    let mut bounds = Bounds::EMPTY;
    for sphere in spheres {
        let extent = Vec3::splat(sphere.radius);
        let local = Bounds::new(sphere.center - extent, sphere.center + extent);
        bounds.expand(&local.transformed(matrix));
    }
    bounds
}
