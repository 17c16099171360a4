//! The three-phase system pipeline.
//!
//! Systems are stateless objects run once per model per frame, in the order
//! they were registered: init systems, then sync systems, then commit
//! systems. A later system may depend on state written by an earlier one in
//! the same frame — that ordering is part of the contract, not a race.
//!
//! Failure of one system on one model stops the remaining systems for that
//! model this frame (so nothing half-reconciled is committed) and is
//! recorded; sibling models are unaffected.

use tracing::{trace, warn};
use viz_backend::Device;
use viz_scene::{Model, Scene};

use crate::error::{ModelFailure, PipelineError};
use crate::systems;

/// Per-frame state shared by all systems.
pub struct FrameContext<'a> {
    /// The rendering device commit systems push to.
    pub device: &'a dyn Device,
    /// The frame being produced.
    pub frame_id: u64,
    /// Set by commit systems when at least one object was pushed; the engine
    /// only commits the backend world when something actually changed.
    pub committed: bool,
}

impl<'a> FrameContext<'a> {
    /// Create the context for one frame.
    #[must_use]
    pub fn new(device: &'a dyn Device, frame_id: u64) -> Self {
        Self {
            device,
            frame_id,
            committed: false,
        }
    }
}

/// A stateless per-frame operation over one model's components.
///
/// `execute` must be idempotent given unchanged inputs: running a system
/// twice in a row without intervening mutation leaves the model identical.
pub trait System: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Run over one model.
    ///
    /// # Errors
    ///
    /// A [`PipelineError`] scoped to this model; the pipeline isolates it
    /// and continues with other models.
    fn execute(&self, model: &mut Model, ctx: &mut FrameContext<'_>) -> Result<(), PipelineError>;
}

/// Ordered list of systems, split into the three phases.
pub struct Pipeline {
    init: Vec<Box<dyn System>>,
    sync: Vec<Box<dyn System>>,
    commit: Vec<Box<dyn System>>,
}

impl Pipeline {
    /// An empty pipeline. Use the `with_*` builders to register systems.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            init: Vec::new(),
            sync: Vec::new(),
            commit: Vec::new(),
        }
    }

    /// The standard pipeline with the full system set, in canonical order.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_init(systems::init::GeometryInit)
            .with_init(systems::init::LightsInit)
            .with_sync(systems::sync::TransformSync)
            .with_sync(systems::sync::ColorSync)
            .with_sync(systems::sync::BoundsSync)
            .with_commit(systems::commit::MaterialCommit)
            .with_commit(systems::commit::GeometryCommit)
            .with_commit(systems::commit::VolumeCommit)
            .with_commit(systems::commit::LightCommit)
            .with_commit(systems::commit::ClipPlaneCommit)
    }

    /// Append an init-phase system.
    #[must_use]
    pub fn with_init(mut self, system: impl System + 'static) -> Self {
        self.init.push(Box::new(system));
        self
    }

    /// Append a sync-phase system.
    #[must_use]
    pub fn with_sync(mut self, system: impl System + 'static) -> Self {
        self.sync.push(Box::new(system));
        self
    }

    /// Append a commit-phase system.
    #[must_use]
    pub fn with_commit(mut self, system: impl System + 'static) -> Self {
        self.commit.push(Box::new(system));
        self
    }

    fn phases(&self) -> impl Iterator<Item = &dyn System> {
        self.init
            .iter()
            .chain(&self.sync)
            .chain(&self.commit)
            .map(Box::as_ref)
    }

    /// Run every phase over one model. The first failing system aborts the
    /// rest of this model's frame.
    ///
    /// # Errors
    ///
    /// The failure of the first system that errored.
    pub fn run_model(
        &self,
        model: &mut Model,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), ModelFailure> {
        for system in self.phases() {
            trace!(model_id = %model.id(), system = system.name(), "running system");
            if let Err(error) = system.execute(model, ctx) {
                return Err(ModelFailure {
                    model_id: model.id(),
                    system: system.name(),
                    error,
                });
            }
        }
        Ok(())
    }

    /// Run the pipeline over every model in the scene, isolating per-model
    /// failures. Returns the failures collected this frame.
    pub fn run(&self, scene: &mut Scene, ctx: &mut FrameContext<'_>) -> Vec<ModelFailure> {
        let mut failures = Vec::new();
        for model in scene.models_mut() {
            if let Err(failure) = self.run_model(model, ctx) {
                warn!(
                    frame_id = ctx.frame_id,
                    model_id = %failure.model_id,
                    system = failure.system,
                    error = %failure.error,
                    "model failed this frame"
                );
                failures.push(failure);
            }
        }
        failures
    }
}
