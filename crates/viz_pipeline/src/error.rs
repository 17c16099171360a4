//! Pipeline and adapter error types.

use viz_backend::DeviceError;
use viz_scene::ModelId;

/// Domain validation or device failure inside a render-object adapter.
///
/// `BadParameter` is the recoverable "your data is out of range" case: it is
/// raised before any backend call is made, so a rejected update leaves both
/// the scene and the backend untouched.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// A component value violates a domain constraint.
    #[error("bad parameter '{name}': {reason}")]
    BadParameter {
        /// The offending parameter.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The backend rejected an operation.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl AdapterError {
    pub(crate) fn bad(name: &'static str, reason: impl Into<String>) -> Self {
        Self::BadParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Failure of one system on one model.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An adapter reported a validation or device error.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// A direct device failure outside any adapter.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// A model-scoped pipeline failure, recorded so the frame can continue with
/// sibling models and report afterwards.
#[derive(Debug)]
pub struct ModelFailure {
    /// The model the failing system was processing.
    pub model_id: ModelId,
    /// The name of the failing system.
    pub system: &'static str,
    /// What went wrong.
    pub error: PipelineError,
}

impl std::fmt::Display for ModelFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed on {}: {}", self.system, self.model_id, self.error)
    }
}
