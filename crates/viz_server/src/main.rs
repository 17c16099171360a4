mod api;
mod frame_loop;

use std::sync::{Arc, Mutex};

use api::Api;
use clap::Parser;
use frame_loop::FrameLoop;
use tracing::info;
use uuid::Uuid;

use viz_backend::mock::MockDevice;
use viz_backend::{Device, RenderSettings};
use viz_engine::Engine;
use viz_pipeline::Pipeline;
use viz_scene::Scene;

#[derive(Parser)]
#[command(name = "viz-server", about = "Interactive visualization renderer over NATS")]
struct Args {
    /// NATS server URL
    #[arg(short, long, default_value = "nats://127.0.0.1:4222")]
    nats_url: String,

    /// NATS subject prefix
    #[arg(short, long, default_value = "viz")]
    prefix: String,

    /// Framebuffer width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Framebuffer height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Target frame rate
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let instance_id = Uuid::new_v4();
    info!(%instance_id, "viz-server starting");

    // The recording device stands in for a ray-tracing backend; anything
    // implementing the Device trait slots in here.
    let device: Arc<dyn Device> = Arc::new(MockDevice::new());

    let settings = RenderSettings {
        width: args.width,
        height: args.height,
        ..RenderSettings::default()
    };
    let engine = Engine::new(Arc::clone(&device), Pipeline::standard(), settings);
    let render = engine.render_handle();

    let scene = Arc::new(Mutex::new(Scene::new()));
    let engine = Arc::new(Mutex::new(engine));

    info!(url = %args.nats_url, "connecting to NATS");
    let client = async_nats::connect(&args.nats_url).await?;
    info!("connected to NATS");

    // Frame production runs independently of command handling.
    let frame_loop = FrameLoop::new(
        Arc::clone(&scene),
        Arc::clone(&engine),
        client.clone(),
        args.prefix.clone(),
        args.fps,
    );
    tokio::spawn(frame_loop.run());

    let api = Api::new(scene, engine, device, render, client, args.prefix);
    api.run().await?;

    Ok(())
}
