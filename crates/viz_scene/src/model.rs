//! Scene model: identity + component store + transform + derived bounds.

use tracing::debug;
use viz_backend::Device;
use viz_math::{Bounds, Transform};

use crate::component::Component;
use crate::id::ModelId;
use crate::store::ComponentStore;

/// A scene entity composed of typed components plus a transform.
pub struct Model {
    id: ModelId,
    transform: Transform,
    store: ComponentStore,
    bounds: Bounds,
}

impl Model {
    /// Create a model with an empty component store.
    #[must_use]
    pub fn new(id: ModelId, transform: Transform) -> Self {
        Self {
            id,
            transform,
            store: ComponentStore::new(),
            bounds: Bounds::EMPTY,
        }
    }

    /// The model's identity.
    #[must_use]
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// The model's transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Replace the transform. Bounds become stale until the next
    /// [`Model::compute_bounds`] (the pipeline's sync phase runs it every
    /// frame).
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// The component store.
    #[must_use]
    pub fn components(&self) -> &ComponentStore {
        &self.store
    }

    /// The component store, mutably.
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    /// Most recently computed world-space bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Recompute world-space bounds: union of every bounds-contributing
    /// component's local bounds under the model matrix. Models with no
    /// geometry (e.g. light-only) end up with the empty bounds.
    pub fn compute_bounds(&mut self) -> Bounds {
        let matrix = self.transform.to_matrix();
        let mut bounds = Bounds::EMPTY;
        for component in self.store.iter() {
            if let Some(local) = component.local_bounds(matrix) {
                bounds.expand(&local);
            }
        }
        self.bounds = bounds;
        bounds
    }

    /// Run every component's teardown hook. The scene calls this exactly
    /// once, before dropping the model, so backend handles are released
    /// ahead of the store itself.
    pub fn destroy(&mut self, device: &dyn Device) {
        debug!(model_id = %self.id, components = self.store.len(), "destroying model");
        for component in self.store.iter_mut() {
            component.on_destroy(device);
        }
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("transform", &self.transform)
            .field("bounds", &self.bounds)
            .field("store", &self.store)
            .finish()
    }
}
