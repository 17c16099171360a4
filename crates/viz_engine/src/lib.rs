//! # viz_engine
//!
//! The frame loop. One [`Engine`] drives the system pipeline over the scene
//! once per frame, commits the backend world when anything changed, and
//! requests a framebuffer with cancellation support: a newer frame request
//! cancels the in-flight render, because stale-frame work is wasted work.

pub mod engine;
pub mod report;

pub use engine::{Engine, RenderHandle};
pub use report::FrameReport;
