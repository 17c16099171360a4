//! Renderable marker component.

use serde::{Deserialize, Serialize};
use viz_scene::Component;

/// What kind of render group a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderGroup {
    /// The model carries committable geometry.
    #[default]
    Geometric,
    /// The model only carries lights; no geometry will be committed.
    LightsOnly,
}

/// Marks a model as participating in rendering.
///
/// The init phase synthesizes this from whichever components are present:
/// geometry yields a [`RenderGroup::Geometric`] renderable, lights without
/// geometry a [`RenderGroup::LightsOnly`] one. Init never overwrites an
/// existing renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Renderable {
    /// The render group this model belongs to.
    pub group: RenderGroup,
}

impl Renderable {
    /// A light-only render group.
    #[must_use]
    pub fn lights_only() -> Self {
        Self {
            group: RenderGroup::LightsOnly,
        }
    }
}

impl Component for Renderable {
    fn type_name(&self) -> &'static str {
        "Renderable"
    }
}
