//! The [`Device`] trait — the committed-object protocol.
//!
//! The protocol is: create an object by kind name, fill its named-parameter
//! table, commit it, and eventually release it. When the scene changes,
//! `commit_world` seals the current object set and `render` produces a
//! framebuffer (or reports cancellation).

use std::fmt;

use crate::cancel::CancelToken;
use crate::error::DeviceError;
use crate::params::ParamMap;
use crate::settings::RenderSettings;

/// An opaque handle to a committed backend object.
///
/// Handles are owned by the component that created them; the owner must
/// release the handle exactly once, before the component is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

/// A rendered pixel buffer, RGBA8 row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, RGBA8.
    pub pixels: Vec<u8>,
}

/// The external rendering backend, seen through the committed-object
/// protocol.
///
/// Methods take `&self`: a device is shared between the frame loop and tests
/// via `Arc<dyn Device>`, so implementations use interior mutability.
pub trait Device: Send + Sync {
    /// Create a new object of the given kind (e.g. `"sphere"`, `"distant"`,
    /// `"thinGlass"`).
    ///
    /// # Errors
    ///
    /// [`DeviceError::UnknownKind`] if the device does not support the kind.
    fn create(&self, kind: &str) -> Result<Handle, DeviceError>;

    /// Replace the object's named-parameter table.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidHandle`] if `handle` is not live.
    fn set_params(&self, handle: Handle, params: ParamMap) -> Result<(), DeviceError>;

    /// Commit the object's current parameters.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidHandle`] if `handle` is not live.
    fn commit(&self, handle: Handle) -> Result<(), DeviceError>;

    /// Release an object. The handle must not be used afterwards.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidHandle`] if `handle` is not live.
    fn release(&self, handle: Handle) -> Result<(), DeviceError>;

    /// Seal the current set of committed objects into a renderable world.
    ///
    /// # Errors
    ///
    /// Returns a device-specific error if the world cannot be built.
    fn commit_world(&self) -> Result<(), DeviceError>;

    /// Produce a framebuffer for the current world.
    ///
    /// Blocks until the frame is done or `cancel` fires, in which case
    /// [`DeviceError::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// [`DeviceError::Cancelled`] or [`DeviceError::Render`].
    fn render(
        &self,
        settings: &RenderSettings,
        cancel: &CancelToken,
    ) -> Result<Framebuffer, DeviceError>;
}
