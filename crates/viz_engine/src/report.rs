//! Per-frame outcome report.

use std::time::Duration;

use viz_backend::{DeviceError, Framebuffer};
use viz_pipeline::ModelFailure;

/// What one call to [`Engine::render_frame`](crate::Engine::render_frame)
/// produced.
///
/// Model-scoped pipeline failures land in `failures`; frame-scoped problems
/// (world commit failure, cancelled or failed render) land in `error`. Both
/// can be empty on a clean frame.
#[derive(Debug)]
pub struct FrameReport {
    /// The frame counter value for this frame.
    pub frame_id: u64,
    /// Wall time the frame took, pipeline plus render.
    pub duration: Duration,
    /// Number of models processed.
    pub models: usize,
    /// Per-model pipeline failures, isolated from each other.
    pub failures: Vec<ModelFailure>,
    /// Frame-scoped failure, if the commit or render step failed.
    pub error: Option<DeviceError>,
    /// The rendered pixels, when the render completed.
    pub framebuffer: Option<Framebuffer>,
}

impl FrameReport {
    /// `true` when the frame produced a framebuffer with no failures at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.error.is_none() && self.framebuffer.is_some()
    }
}
