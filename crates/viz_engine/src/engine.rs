//! The engine: pipeline execution, backend commit, render dispatch.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, info, warn};
use viz_backend::{Camera, CancelToken, Device, RenderSettings};
use viz_pipeline::{AdapterError, FrameContext, Pipeline, adapters};
use viz_scene::Scene;

use crate::report::FrameReport;

type InFlight = Arc<Mutex<Option<CancelToken>>>;

/// Cancels the engine's in-flight render from another thread.
///
/// The control path holds one of these so a `render.trigger` command can
/// abort a stale frame without waiting for the engine lock.
#[derive(Debug, Clone)]
pub struct RenderHandle {
    in_flight: InFlight,
}

impl RenderHandle {
    /// Cancel the in-flight render, if any. Harmless when nothing renders.
    pub fn cancel_in_flight(&self) {
        if let Some(token) = self.in_flight.lock().unwrap().as_ref() {
            debug!("cancelling in-flight render");
            token.cancel();
        }
    }
}

/// Drives the pipeline and the backend once per frame.
///
/// The render-trigger and streaming flags are explicit engine state, passed
/// by reference to whoever needs to request a re-render — never ambient
/// globals.
pub struct Engine {
    device: Arc<dyn Device>,
    pipeline: Pipeline,
    settings: RenderSettings,
    frame_id: u64,
    render_requested: bool,
    in_flight: InFlight,
}

impl Engine {
    /// Create an engine over a device with the given pipeline and settings.
    #[must_use]
    pub fn new(device: Arc<dyn Device>, pipeline: Pipeline, settings: RenderSettings) -> Self {
        Self {
            device,
            pipeline,
            settings,
            frame_id: 0,
            render_requested: false,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// The device this engine commits to.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn Device> {
        &self.device
    }

    /// Current render settings.
    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Replace the camera after validating it.
    ///
    /// # Errors
    ///
    /// [`AdapterError::BadParameter`] when the camera violates a domain
    /// constraint; the previous camera stays in place.
    pub fn set_camera(&mut self, camera: Camera) -> Result<(), AdapterError> {
        adapters::camera::validate(&camera)?;
        self.settings.camera = camera;
        self.render_requested = true;
        Ok(())
    }

    /// Resize the framebuffer.
    pub fn set_frame_size(&mut self, width: u32, height: u32) {
        self.settings.width = width;
        self.settings.height = height;
        self.render_requested = true;
    }

    /// Request a frame even if the scene is unchanged.
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Does the next loop iteration need to produce a frame?
    #[must_use]
    pub fn needs_frame(&self, scene: &Scene) -> bool {
        self.render_requested || scene.is_modified()
    }

    /// A handle for cancelling this engine's in-flight render.
    #[must_use]
    pub fn render_handle(&self) -> RenderHandle {
        RenderHandle {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Produce one frame.
    ///
    /// Runs the pipeline across all models (isolating per-model failures),
    /// commits the backend world when any commit system pushed data, then
    /// renders under a fresh cancel token. The scene's modified flag is
    /// cleared only after a successful world commit.
    pub fn render_frame(&mut self, scene: &mut Scene) -> FrameReport {
        // A new frame supersedes whatever is still rendering.
        self.render_handle().cancel_in_flight();

        self.frame_id += 1;
        let frame_id = self.frame_id;
        let start = Instant::now();
        debug!(frame_id, models = scene.len(), "frame start");

        let mut ctx = FrameContext::new(self.device.as_ref(), frame_id);
        let failures = self.pipeline.run(scene, &mut ctx);

        let mut frame_error = None;
        if ctx.committed {
            match self.device.commit_world() {
                Ok(()) => scene.clear_modified(),
                Err(e) => {
                    warn!(frame_id, error = %e, "world commit failed");
                    frame_error = Some(e);
                }
            }
        } else if scene.is_modified() {
            // Nothing reached the backend (e.g. every dirty model failed),
            // so the scene stays modified and the next frame retries.
            debug!(frame_id, "no backend changes this frame");
            if failures.is_empty() {
                scene.clear_modified();
            }
        }

        let framebuffer = if frame_error.is_none() {
            let token = CancelToken::new();
            *self.in_flight.lock().unwrap() = Some(token.clone());
            let result = self.device.render(&self.settings, &token);
            *self.in_flight.lock().unwrap() = None;
            match result {
                Ok(fb) => Some(fb),
                Err(e) => {
                    info!(frame_id, error = %e, "render did not complete");
                    frame_error = Some(e);
                    None
                }
            }
        } else {
            None
        };

        if framebuffer.is_some() {
            self.render_requested = false;
        }

        let report = FrameReport {
            frame_id,
            duration: start.elapsed(),
            models: scene.len(),
            failures,
            error: frame_error,
            framebuffer,
        };
        debug!(
            frame_id,
            duration_ms = report.duration.as_millis() as u64,
            failures = report.failures.len(),
            clean = report.is_clean(),
            "frame end"
        );
        report
    }
}
