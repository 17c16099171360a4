//! # viz_backend
//!
//! The rendering backend boundary. The core never talks to a concrete
//! ray-tracing library directly — it hands the backend *committed objects*
//! identified by a type-name string (`"sphere"`, `"distant"`, `"thinGlass"`,
//! ...) plus a table of named typed parameters, and the backend returns
//! opaque handles and, on request, a pixel buffer.
//!
//! This crate provides:
//!
//! - [`device`] — the [`Device`](device::Device) trait and object handles.
//! - [`params`] — typed named-parameter tables.
//! - [`settings`] — frame size and camera settings passed to `render`.
//! - [`cancel`] — cooperative cancellation for in-flight renders.
//! - [`mock`] — a recording [`MockDevice`](mock::MockDevice) for tests.

pub mod cancel;
pub mod device;
pub mod error;
pub mod mock;
pub mod params;
pub mod settings;

pub use cancel::CancelToken;
pub use device::{Device, Framebuffer, Handle};
pub use error::DeviceError;
pub use params::{ParamMap, ParamValue};
pub use settings::{Camera, Projection, RenderSettings};
