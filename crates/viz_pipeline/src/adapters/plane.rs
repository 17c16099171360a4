//! Plane geometry adapter.
//!
//! Handles both visible planes and clip planes — the only difference at the
//! backend boundary is the `clipping` flag.

use glam::{Mat4, Vec3};
use viz_backend::params::{ParamValue, Params};
use viz_backend::{Device, Handle};
use viz_math::Bounds;

use crate::components::Plane;
use crate::error::AdapterError;

/// Validate a plane list.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] if any plane has a zero or non-finite
/// normal.
pub fn validate(planes: &[Plane]) -> Result<(), AdapterError> {
    for (index, plane) in planes.iter().enumerate() {
        let normal = Vec3::new(
            plane.coefficients.x,
            plane.coefficients.y,
            plane.coefficients.z,
        );
        if !plane.coefficients.is_finite() {
            return Err(AdapterError::bad(
                "coefficients",
                format!("plane {index} has non-finite coefficients"),
            ));
        }
        if normal.length_squared() == 0.0 {
            return Err(AdapterError::bad(
                "coefficients",
                format!("plane {index} has a zero normal"),
            ));
        }
    }
    Ok(())
}

/// Push the full plane list into the backend object and commit it.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] on validation failure (before any device
/// call), or a device error from `set_params`/`commit`.
pub fn update(
    device: &dyn Device,
    handle: Handle,
    planes: &[Plane],
    clipping: bool,
) -> Result<(), AdapterError> {
    validate(planes)?;

    let mut data = Vec::with_capacity(planes.len() * 4);
    for plane in planes {
        data.extend_from_slice(&plane.coefficients.to_array());
    }

    let params = Params::new()
        .set("plane.coefficients", ParamValue::FloatBuffer(data))
        .set("clipping", ParamValue::Bool(clipping))
        .build();

    device.set_params(handle, params)?;
    device.commit(handle)?;
    Ok(())
}

/// Bounds of an infinite plane list: always the empty bounds, by design.
#[must_use]
pub fn compute_bounds(_matrix: Mat4, _planes: &[Plane]) -> Bounds {
    Bounds::EMPTY
}

#[cfg(test)]
mod tests {
    use glam::Vec4;
    use viz_backend::mock::MockDevice;

    use super::*;

    #[test]
    fn test_validate_rejects_zero_normal() {
        let err = validate(&[Plane {
            coefficients: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }])
        .unwrap_err();
        assert!(matches!(err, AdapterError::BadParameter { .. }));
    }

    #[test]
    fn test_bounds_are_always_empty() {
        let planes = [Plane {
            coefficients: Vec4::new(0.0, 1.0, 0.0, 0.0),
        }];
        assert!(compute_bounds(Mat4::IDENTITY, &planes).is_empty());
    }

    #[test]
    fn test_update_sets_clipping_flag() {
        let device = MockDevice::new();
        let handle = device.create("plane").unwrap();
        update(
            &device,
            handle,
            &[Plane {
                coefficients: Vec4::new(1.0, 0.0, 0.0, 0.5),
            }],
            true,
        )
        .unwrap();

        let calls = device.calls();
        let params = calls
            .iter()
            .find_map(|c| match c {
                viz_backend::mock::DeviceCall::SetParams { params, .. } => Some(params),
                _ => None,
            })
            .unwrap();
        assert_eq!(params["clipping"], ParamValue::Bool(true));
    }
}
