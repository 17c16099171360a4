//! Backend-boundary error types.

use crate::device::Handle;

/// Errors reported by a rendering device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device does not know the requested object kind.
    #[error("unknown object kind: '{0}'")]
    UnknownKind(String),

    /// An operation referenced a handle the device never issued, or one that
    /// has already been released.
    #[error("invalid object handle: {0}")]
    InvalidHandle(Handle),

    /// The render was cancelled before a framebuffer was produced.
    #[error("render cancelled")]
    Cancelled,

    /// The device failed to produce a framebuffer.
    #[error("render failed: {0}")]
    Render(String),
}
