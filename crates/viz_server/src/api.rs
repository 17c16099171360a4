/// NATS API handler — subscribes to subjects and handles scene operations.
///
/// Subjects (all under a configurable prefix, default "viz"):
///
///   Request/Reply:
///     {prefix}.model.add       — create model, optional initial components
///     {prefix}.model.remove    — destroy model, release backend handles
///     {prefix}.model.list      — list all live model IDs
///     {prefix}.model.get       — snapshot of one model
///     {prefix}.transform.set   — replace a model's transform
///     {prefix}.material.set    — set the material on a geometric model
///     {prefix}.light.add       — append a light to a model
///     {prefix}.clipplane.add   — append a clip plane to a model
///     {prefix}.camera.set      — replace the render camera
///     {prefix}.render.trigger  — force a frame, cancelling in-flight work
///     {prefix}.scene.bounds    — world-space bounds of the whole scene
///
///   Publish (broadcast):
///     {prefix}.events.model.added    — model created
///     {prefix}.events.model.removed  — model destroyed
///     {prefix}.events.frame.done     — frame metadata (JSON)
///     {prefix}.events.frame.pixels   — frame pixels (MessagePack)
use std::sync::{Arc, Mutex};

use async_nats::Client;
use glam::Vec4;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use viz_backend::{Camera, Device};
use viz_engine::{Engine, RenderHandle};
use viz_math::Transform;
use viz_pipeline::AdapterError;
use viz_pipeline::adapters;
use viz_pipeline::components::{
    ClipPlanes, Geometry, Light, Lights, Material, MaterialComponent, Plane, Sphere, Volume,
    VolumeData,
};
use viz_scene::{ModelId, Scene, SceneError};

pub struct Api {
    scene: Arc<Mutex<Scene>>,
    engine: Arc<Mutex<Engine>>,
    device: Arc<dyn Device>,
    render: RenderHandle,
    client: Client,
    prefix: String,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ModelAddRequest {
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    spheres: Option<Vec<Sphere>>,
    #[serde(default)]
    planes: Option<Vec<Plane>>,
    #[serde(default)]
    volume: Option<VolumeData>,
    #[serde(default)]
    lights: Option<Vec<Light>>,
    #[serde(default)]
    base_color: Option<Vec4>,
}

#[derive(Serialize)]
struct ModelAddResponse {
    model_id: ModelId,
}

#[derive(Deserialize)]
struct ModelRequest {
    model_id: ModelId,
}

#[derive(Deserialize)]
struct TransformSetRequest {
    model_id: ModelId,
    transform: Transform,
}

#[derive(Deserialize)]
struct MaterialSetRequest {
    model_id: ModelId,
    material: Material,
}

#[derive(Deserialize)]
struct LightAddRequest {
    model_id: ModelId,
    light: Light,
}

#[derive(Deserialize)]
struct ClipPlaneAddRequest {
    model_id: ModelId,
    plane: Plane,
}

#[derive(Deserialize)]
struct CameraSetRequest {
    camera: Camera,
}

#[derive(Serialize)]
struct ApiError {
    kind: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ApiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    ok: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

impl ApiResponse {
    fn ok(value: Value) -> Self {
        Self {
            ok: Some(value),
            error: None,
        }
    }

    fn error(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            ok: None,
            error: Some(ApiError {
                kind,
                message: message.into(),
            }),
        }
    }

    fn bad_request(e: impl std::fmt::Display) -> Self {
        Self::error("BadRequest", format!("invalid request: {e}"))
    }

    fn from_scene_error(e: &SceneError) -> Self {
        let kind = match e {
            SceneError::UnknownModel(_) => "UnknownModel",
            SceneError::IdExhausted => "IdExhausted",
        };
        Self::error(kind, e.to_string())
    }

    fn from_adapter_error(e: &AdapterError) -> Self {
        let kind = match e {
            AdapterError::BadParameter { .. } => "BadParameter",
            AdapterError::Device(_) => "Device",
        };
        Self::error(kind, e.to_string())
    }

    fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| b"{}".to_vec())
    }
}

// ---------------------------------------------------------------------------
// Event payloads (broadcast)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ModelEvent {
    model_id: ModelId,
}

// ---------------------------------------------------------------------------
// API implementation
// ---------------------------------------------------------------------------

impl Api {
    pub fn new(
        scene: Arc<Mutex<Scene>>,
        engine: Arc<Mutex<Engine>>,
        device: Arc<dyn Device>,
        render: RenderHandle,
        client: Client,
        prefix: String,
    ) -> Self {
        Self {
            scene,
            engine,
            device,
            render,
            client,
            prefix,
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        use futures_util::StreamExt;

        // Subscribe to all subjects under the prefix using a wildcard.
        let subject = format!("{}.>", self.prefix);
        info!(subject = %subject, "subscribing to API subjects");
        let mut sub = self.client.subscribe(subject).await?;

        info!("viz-server ready, listening for requests");

        while let Some(msg) = sub.next().await {
            let subject = msg.subject.as_str().to_string();
            let reply = msg.reply.clone();

            // Strip the prefix to get the operation.
            let op = subject
                .strip_prefix(&self.prefix)
                .and_then(|s| s.strip_prefix('.'))
                .unwrap_or("");

            // Our own broadcasts come back through the wildcard; skip them.
            if op.starts_with("events.") {
                continue;
            }

            debug!(op = %op, "received request");

            let response = match op {
                "model.add" => self.handle_model_add(&msg.payload).await,
                "model.remove" => self.handle_model_remove(&msg.payload).await,
                "model.list" => self.handle_model_list(),
                "model.get" => self.handle_model_get(&msg.payload),
                "transform.set" => self.handle_transform_set(&msg.payload),
                "material.set" => self.handle_material_set(&msg.payload),
                "light.add" => self.handle_light_add(&msg.payload),
                "clipplane.add" => self.handle_clipplane_add(&msg.payload),
                "camera.set" => self.handle_camera_set(&msg.payload),
                "render.trigger" => self.handle_render_trigger(),
                "scene.bounds" => self.handle_scene_bounds(),
                _ => {
                    warn!(op = %op, "unknown operation");
                    ApiResponse::error("UnknownOperation", format!("unknown operation: {op}"))
                }
            };

            // Reply if request/reply pattern.
            if let Some(reply_to) = reply {
                if let Err(e) = self
                    .client
                    .publish(reply_to, response.to_bytes().into())
                    .await
                {
                    error!(%e, "failed to publish reply");
                }
            }
        }

        Ok(())
    }

    async fn publish_event(&self, suffix: &str, payload: Vec<u8>) {
        let subject = format!("{}.events.{}", self.prefix, suffix);
        if let Err(e) = self.client.publish(subject, payload.into()).await {
            warn!(%e, suffix, "failed to publish event");
        }
    }

    // -- Handlers --

    async fn handle_model_add(&self, payload: &[u8]) -> ApiResponse {
        let req: ModelAddRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        let id = {
            let mut scene = self.scene.lock().unwrap();
            match add_model(&mut scene, req) {
                Ok(id) => id,
                Err(resp) => return resp,
            }
        };

        let event = serde_json::to_vec(&ModelEvent { model_id: id }).unwrap_or_default();
        self.publish_event("model.added", event).await;

        match serde_json::to_value(ModelAddResponse { model_id: id }) {
            Ok(v) => ApiResponse::ok(v),
            Err(e) => ApiResponse::error("Internal", e.to_string()),
        }
    }

    async fn handle_model_remove(&self, payload: &[u8]) -> ApiResponse {
        let req: ModelRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        let result = {
            let mut scene = self.scene.lock().unwrap();
            scene.remove_model(req.model_id, self.device.as_ref())
        };
        match result {
            Ok(()) => {
                let event = serde_json::to_vec(&ModelEvent {
                    model_id: req.model_id,
                })
                .unwrap_or_default();
                self.publish_event("model.removed", event).await;
                ApiResponse::ok(Value::Null)
            }
            Err(e) => ApiResponse::from_scene_error(&e),
        }
    }

    fn handle_model_list(&self) -> ApiResponse {
        let scene = self.scene.lock().unwrap();
        let ids = scene.model_ids();
        ApiResponse::ok(serde_json::json!({
            "models": ids,
            "count": ids.len(),
        }))
    }

    fn handle_model_get(&self, payload: &[u8]) -> ApiResponse {
        let req: ModelRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        let scene = self.scene.lock().unwrap();
        match scene.model(req.model_id) {
            Ok(model) => {
                let components: Vec<&str> =
                    model.components().iter().map(|c| c.type_name()).collect();
                ApiResponse::ok(serde_json::json!({
                    "model_id": model.id(),
                    "transform": model.transform(),
                    "bounds": model.bounds(),
                    "components": components,
                }))
            }
            Err(e) => ApiResponse::from_scene_error(&e),
        }
    }

    fn handle_transform_set(&self, payload: &[u8]) -> ApiResponse {
        let req: TransformSetRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        let mut scene = self.scene.lock().unwrap();
        match scene.model_mut(req.model_id) {
            Ok(model) => {
                model.set_transform(req.transform);
                ApiResponse::ok(Value::Null)
            }
            Err(e) => ApiResponse::from_scene_error(&e),
        }
    }

    fn handle_material_set(&self, payload: &[u8]) -> ApiResponse {
        let req: MaterialSetRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        if let Err(e) = adapters::material::validate(&req.material) {
            return ApiResponse::from_adapter_error(&e);
        }

        let mut scene = self.scene.lock().unwrap();
        // Check before model_mut: a rejected request must not dirty the
        // scene.
        let has_geometry = match scene.model(req.model_id) {
            Ok(model) => model.components().has::<Geometry>(),
            Err(e) => return ApiResponse::from_scene_error(&e),
        };
        if !has_geometry {
            return ApiResponse::error(
                "UnknownComponent",
                format!("{} has no geometry to apply a material to", req.model_id),
            );
        }
        let model = scene.model_mut(req.model_id).unwrap();
        model
            .components_mut()
            .get_or_add::<MaterialComponent>()
            .set(req.material);
        ApiResponse::ok(Value::Null)
    }

    fn handle_light_add(&self, payload: &[u8]) -> ApiResponse {
        let req: LightAddRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        if let Err(e) = adapters::light::validate(&req.light) {
            return ApiResponse::from_adapter_error(&e);
        }

        let mut scene = self.scene.lock().unwrap();
        if let Err(e) = scene.model(req.model_id) {
            return ApiResponse::from_scene_error(&e);
        }
        let model = scene.model_mut(req.model_id).unwrap();
        model.components_mut().get_or_add::<Lights>().push(req.light);
        ApiResponse::ok(Value::Null)
    }

    fn handle_clipplane_add(&self, payload: &[u8]) -> ApiResponse {
        let req: ClipPlaneAddRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        if let Err(e) = adapters::plane::validate(std::slice::from_ref(&req.plane)) {
            return ApiResponse::from_adapter_error(&e);
        }

        let mut scene = self.scene.lock().unwrap();
        if let Err(e) = scene.model(req.model_id) {
            return ApiResponse::from_scene_error(&e);
        }
        let model = scene.model_mut(req.model_id).unwrap();
        model
            .components_mut()
            .get_or_add::<ClipPlanes>()
            .push(req.plane);
        ApiResponse::ok(Value::Null)
    }

    fn handle_camera_set(&self, payload: &[u8]) -> ApiResponse {
        let req: CameraSetRequest = match serde_json::from_slice(payload) {
            Ok(r) => r,
            Err(e) => return ApiResponse::bad_request(e),
        };

        let mut engine = self.engine.lock().unwrap();
        match engine.set_camera(req.camera) {
            Ok(()) => ApiResponse::ok(Value::Null),
            Err(e) => ApiResponse::from_adapter_error(&e),
        }
    }

    fn handle_render_trigger(&self) -> ApiResponse {
        // A newer request makes the in-flight frame stale.
        self.render.cancel_in_flight();
        self.engine.lock().unwrap().request_render();
        ApiResponse::ok(Value::Null)
    }

    fn handle_scene_bounds(&self) -> ApiResponse {
        let scene = self.scene.lock().unwrap();
        let bounds = scene.bounds();
        ApiResponse::ok(serde_json::json!({
            "bounds": bounds,
            "empty": bounds.is_empty(),
        }))
    }
}

/// Validate the whole request up front and only then touch the scene, so a
/// rejected add leaves it exactly as it was.
fn add_model(scene: &mut Scene, req: ModelAddRequest) -> Result<ModelId, ApiResponse> {
    if let Some(spheres) = &req.spheres {
        adapters::sphere::validate(spheres).map_err(|e| ApiResponse::from_adapter_error(&e))?;
    }
    if let Some(planes) = &req.planes {
        adapters::plane::validate(planes).map_err(|e| ApiResponse::from_adapter_error(&e))?;
    }
    if let Some(volume) = &req.volume {
        adapters::volume::validate(volume).map_err(|e| ApiResponse::from_adapter_error(&e))?;
    }
    for light in req.lights.iter().flatten() {
        adapters::light::validate(light).map_err(|e| ApiResponse::from_adapter_error(&e))?;
    }

    let id = scene
        .add_model(req.transform.unwrap_or(Transform::IDENTITY))
        .map_err(|e| ApiResponse::from_scene_error(&e))?;
    let model = scene.model_mut(id).unwrap();
    if let Some(spheres) = req.spheres {
        let mut geometry = Geometry::spheres(spheres);
        if let Some(color) = req.base_color {
            geometry.base_color = color;
        }
        model.components_mut().add(geometry);
    } else if let Some(planes) = req.planes {
        let mut geometry = Geometry::planes(planes);
        if let Some(color) = req.base_color {
            geometry.base_color = color;
        }
        model.components_mut().add(geometry);
    }
    if let Some(volume) = req.volume {
        model.components_mut().add(Volume::new(volume));
    }
    if let Some(lights) = req.lights {
        model.components_mut().add(Lights::new(lights));
    }
    Ok(id)
}
