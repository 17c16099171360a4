//! Volume adapter.
//!
//! Backend layout: grid dimensions as an unsigned vector, spacing and origin
//! as float vectors, the scalar samples as a flat float buffer, and the model
//! matrix as a 16-float column-major buffer.

use glam::{Mat4, Vec3};
use viz_backend::params::{ParamValue, Params};
use viz_backend::{Device, Handle};
use viz_math::Bounds;

use crate::components::VolumeData;
use crate::error::AdapterError;

/// Validate a volume grid.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] for a zero dimension, non-positive or
/// non-finite spacing, or a sample count that does not match the dimensions.
pub fn validate(data: &VolumeData) -> Result<(), AdapterError> {
    let dims = data.dimensions;
    if dims.x == 0 || dims.y == 0 || dims.z == 0 {
        return Err(AdapterError::bad(
            "dimensions",
            format!("{dims}, every axis must be non-zero"),
        ));
    }
    if !data.spacing.is_finite() || data.spacing.min_element() <= 0.0 {
        return Err(AdapterError::bad(
            "spacing",
            format!("{}, expected > 0 per axis", data.spacing),
        ));
    }
    if !data.origin.is_finite() {
        return Err(AdapterError::bad("origin", "non-finite origin"));
    }
    // Dimensions come straight off the wire; the product must not overflow.
    let expected = (dims.x as usize)
        .checked_mul(dims.y as usize)
        .and_then(|n| n.checked_mul(dims.z as usize))
        .ok_or_else(|| {
            AdapterError::bad("dimensions", format!("{dims}, sample count overflows"))
        })?;
    if data.values.len() != expected {
        return Err(AdapterError::bad(
            "values",
            format!("{} samples, dimensions require {expected}", data.values.len()),
        ));
    }
    Ok(())
}

/// Push the full volume grid into the backend object and commit it.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] on validation failure (before any device
/// call), or a device error from `set_params`/`commit`.
pub fn update(
    device: &dyn Device,
    handle: Handle,
    data: &VolumeData,
    matrix: Mat4,
) -> Result<(), AdapterError> {
    validate(data)?;

    let params = Params::new()
        .set("dimensions", ParamValue::UVec3(data.dimensions))
        .set("spacing", ParamValue::Vec3(data.spacing))
        .set("origin", ParamValue::Vec3(data.origin))
        .set("data", ParamValue::FloatBuffer(data.values.clone()))
        .set(
            "transform",
            ParamValue::FloatBuffer(matrix.to_cols_array().to_vec()),
        )
        .build();

    device.set_params(handle, params)?;
    device.commit(handle)?;
    Ok(())
}

/// World-space bounds of the grid under the model matrix.
///
/// Pure function; a degenerate grid (zero on any axis) yields the empty
/// bounds.
#[must_use]
pub fn compute_bounds(matrix: Mat4, data: &VolumeData) -> Bounds {
    let dims = data.dimensions;
    if dims.x == 0 || dims.y == 0 || dims.z == 0 {
        return Bounds::EMPTY;
    }
    let extent = Vec3::new(dims.x as f32, dims.y as f32, dims.z as f32) * data.spacing;
    Bounds::new(data.origin, data.origin + extent).transformed(matrix)
}
