//! Scene-level error types.

use crate::id::ModelId;

/// Recoverable scene errors.
///
/// Contract violations (getting a missing component, recycling a live ID)
/// are *not* represented here — those panic.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The referenced model does not exist.
    #[error("unknown model: {0}")]
    UnknownModel(ModelId),

    /// The ID allocator ran out of representable IDs.
    #[error("model ID space exhausted")]
    IdExhausted,
}
