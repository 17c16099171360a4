//! Camera validation.
//!
//! The camera is engine-owned render state rather than a component, but its
//! domain constraints live here with the other adapters so every
//! backend-visible value is validated the same way.

use viz_backend::{Camera, Projection};

use crate::error::AdapterError;

/// Validate camera settings.
///
/// # Errors
///
/// [`AdapterError::BadParameter`] for a non-positive orthographic height, a
/// degenerate field of view, or a zero up vector.
pub fn validate(camera: &Camera) -> Result<(), AdapterError> {
    match camera.projection {
        Projection::Orthographic { height } => {
            if !height.is_finite() || height <= 0.0 {
                return Err(AdapterError::bad("height", format!("{height}, expected > 0")));
            }
        }
        Projection::Perspective { fov_y } => {
            if !fov_y.is_finite() || fov_y <= 0.0 || fov_y >= 180.0 {
                return Err(AdapterError::bad(
                    "fov_y",
                    format!("{fov_y}, expected in (0, 180)"),
                ));
            }
        }
    }
    if camera.up.length_squared() == 0.0 {
        return Err(AdapterError::bad("up", "zero up vector"));
    }
    Ok(())
}
