//! Model identity and the recycling ID allocator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// A small unsigned model identifier, unique among live models and recycled
/// after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(pub u32);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model({})", self.0)
    }
}

/// Allocates small-integer IDs, preferring recycled IDs over advancing the
/// monotonic counter.
///
/// Recycled IDs are reused most-recently-recycled-first (stack discipline),
/// which keeps allocation deterministic for tests. Recycling an ID that is
/// still in use is a caller contract violation: the allocator cannot detect
/// double ownership, so the caller must guarantee at-most-one-owner of any
/// live ID.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
    recycled: Vec<u32>,
}

impl IdAllocator {
    /// Create an allocator starting at ID 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next available ID.
    ///
    /// # Errors
    ///
    /// [`SceneError::IdExhausted`] when the counter has reached `u32::MAX`
    /// and no recycled ID is available.
    pub fn next(&mut self) -> Result<ModelId, SceneError> {
        if let Some(id) = self.recycled.pop() {
            return Ok(ModelId(id));
        }
        if self.next == u32::MAX {
            return Err(SceneError::IdExhausted);
        }
        let id = self.next;
        self.next += 1;
        Ok(ModelId(id))
    }

    /// Return an ID to the pool.
    pub fn recycle(&mut self, id: ModelId) {
        debug_assert!(
            id.0 < self.next && !self.recycled.contains(&id.0),
            "recycled an ID that was never allocated or is already pooled: {id}"
        );
        self.recycled.push(id.0);
    }
}
