//! # viz_pipeline
//!
//! The entity-component pipeline: the renderable component types, the
//! per-frame [`System`](pipeline::System) trait with its three-phase
//! [`Pipeline`](pipeline::Pipeline), and the render-object
//! [`adapters`] that translate component data into backend parameter tables.
//!
//! Each frame the pipeline runs once per model, in declared order:
//!
//! 1. **Init** — synthesize missing derived components (idempotent via
//!    presence checks).
//! 2. **Sync** — reconcile derived state: transform dirtying, color lists,
//!    bounds.
//! 3. **Commit** — push only *changed* component state to the backend and
//!    clear the per-frame dirty flags.
//!
//! One model's failure never aborts its siblings; failures are collected
//! per model and surfaced by the engine after the frame.

pub mod adapters;
pub mod components;
pub mod error;
pub mod pipeline;
pub mod systems;

pub use error::{AdapterError, ModelFailure, PipelineError};
pub use pipeline::{FrameContext, Pipeline, System};
