//! The model manager.
//!
//! The [`Scene`] is the sole owner of all models; everything else borrows.
//! A `modified` flag is set by every mutating operation and cleared only by
//! the frame loop after a successful commit, so the render path can tell
//! whether a new frame is worth producing.

use std::collections::BTreeMap;

use tracing::{debug, info};
use viz_backend::Device;
use viz_math::{Bounds, Transform};

use crate::error::SceneError;
use crate::id::{IdAllocator, ModelId};
use crate::model::Model;

/// Owns the collection of models, assigns IDs, and tracks modification
/// state.
///
/// A `BTreeMap` keeps model iteration ordered by ID, so pipeline execution
/// across models is deterministic frame to frame.
#[derive(Debug, Default)]
pub struct Scene {
    allocator: IdAllocator,
    models: BTreeMap<ModelId, Model>,
    modified: bool,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty model, assigning it the next available ID.
    ///
    /// # Errors
    ///
    /// [`SceneError::IdExhausted`] when no ID can be allocated.
    pub fn add_model(&mut self, transform: Transform) -> Result<ModelId, SceneError> {
        let id = self.allocator.next()?;
        self.models.insert(id, Model::new(id, transform));
        self.modified = true;
        info!(model_id = %id, "model added");
        Ok(id)
    }

    /// Remove a model: run its teardown hooks, drop it, and recycle its ID.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownModel`] if `id` is not live.
    pub fn remove_model(&mut self, id: ModelId, device: &dyn Device) -> Result<(), SceneError> {
        let mut model = self.models.remove(&id).ok_or(SceneError::UnknownModel(id))?;
        model.destroy(device);
        self.allocator.recycle(id);
        self.modified = true;
        info!(model_id = %id, "model removed");
        Ok(())
    }

    /// Borrow a model.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownModel`] if `id` is not live.
    pub fn model(&self, id: ModelId) -> Result<&Model, SceneError> {
        self.models.get(&id).ok_or(SceneError::UnknownModel(id))
    }

    /// Borrow a model mutably and mark the scene modified.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownModel`] if `id` is not live.
    pub fn model_mut(&mut self, id: ModelId) -> Result<&mut Model, SceneError> {
        let model = self.models.get_mut(&id).ok_or(SceneError::UnknownModel(id))?;
        self.modified = true;
        Ok(model)
    }

    /// Iterate models in ID order.
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Iterate models mutably in ID order. Does not set the modified flag —
    /// the frame loop uses this and reconciles state without dirtying the
    /// scene again.
    pub fn models_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.models.values_mut()
    }

    /// All live model IDs, in order.
    #[must_use]
    pub fn model_ids(&self) -> Vec<ModelId> {
        self.models.keys().copied().collect()
    }

    /// Number of live models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Is the scene empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Union of all model bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::EMPTY;
        for model in self.models.values() {
            bounds.expand(&model.bounds());
        }
        bounds
    }

    /// Has the scene changed since the last successful commit?
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set the modified flag explicitly (e.g. after a mutation through
    /// [`Scene::models_mut`] that should trigger a frame).
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Clear the modified flag. Only the frame loop calls this, after a
    /// successful commit.
    pub fn clear_modified(&mut self) {
        debug!("scene modified flag cleared");
        self.modified = false;
    }
}
