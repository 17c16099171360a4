//! The server's frame loop task.
//!
//! Ticks at a fixed rate, produces a frame whenever the engine reports one
//! is needed (scene modified or render explicitly triggered), and broadcasts
//! the outcome: metadata as JSON on `events.frame.done`, pixels as
//! MessagePack on `events.frame.pixels`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_nats::Client;
use serde::Serialize;
use tracing::{debug, warn};

use viz_engine::{Engine, FrameReport};
use viz_scene::Scene;

#[derive(Serialize)]
struct FrameDone {
    frame_id: u64,
    duration_ms: u64,
    models: usize,
    failures: Vec<FrameFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct FrameFailure {
    model_id: viz_scene::ModelId,
    system: &'static str,
    message: String,
}

#[derive(Serialize)]
struct FramePixels {
    frame_id: u64,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

pub struct FrameLoop {
    scene: Arc<Mutex<Scene>>,
    engine: Arc<Mutex<Engine>>,
    client: Client,
    prefix: String,
    period: Duration,
}

impl FrameLoop {
    pub fn new(
        scene: Arc<Mutex<Scene>>,
        engine: Arc<Mutex<Engine>>,
        client: Client,
        prefix: String,
        fps: f64,
    ) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps.max(1.0));
        Self {
            scene,
            engine,
            client,
            prefix,
            period,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            // Both locks are held for the whole frame so each command's
            // mutation is observed entirely or not at all; they are dropped
            // before any publish await.
            let report = {
                let mut engine = self.engine.lock().unwrap();
                let mut scene = self.scene.lock().unwrap();
                if !engine.needs_frame(&scene) {
                    continue;
                }
                engine.render_frame(&mut scene)
            };

            self.publish_frame(report).await;
        }
    }

    async fn publish_frame(&self, report: FrameReport) {
        let done = FrameDone {
            frame_id: report.frame_id,
            duration_ms: report.duration.as_millis() as u64,
            models: report.models,
            failures: report
                .failures
                .iter()
                .map(|f| FrameFailure {
                    model_id: f.model_id,
                    system: f.system,
                    message: f.error.to_string(),
                })
                .collect(),
            error: report.error.as_ref().map(ToString::to_string),
        };
        if let Ok(payload) = serde_json::to_vec(&done) {
            self.publish("frame.done", payload).await;
        }

        let Some(fb) = report.framebuffer else {
            debug!(frame_id = report.frame_id, "no framebuffer to broadcast");
            return;
        };
        let pixels = FramePixels {
            frame_id: report.frame_id,
            width: fb.width,
            height: fb.height,
            pixels: fb.pixels,
        };
        match rmp_serde::to_vec_named(&pixels) {
            Ok(payload) => self.publish("frame.pixels", payload).await,
            Err(e) => warn!(%e, "failed to encode frame pixels"),
        }
    }

    async fn publish(&self, suffix: &str, payload: Vec<u8>) {
        let subject = format!("{}.events.{}", self.prefix, suffix);
        if let Err(e) = self.client.publish(subject, payload.into()).await {
            warn!(%e, suffix, "failed to publish frame event");
        }
    }
}
