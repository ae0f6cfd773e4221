//! Extent of the current scene.

use bevy_ecs::prelude::Resource;

use crate::components::boundingarea::BoundingArea;

/// Finite bounds of the scene, or `None` for an unbounded scene.
///
/// An empty area is treated as unbounded. Changing this resource makes
/// [`crate::systems::spatial::rebuild_spatial_index`] recreate the index.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct SceneBounds(pub Option<BoundingArea>);

impl SceneBounds {
    pub fn bounded(area: BoundingArea) -> Self {
        Self(Some(area))
    }

    /// The finite area, if any.
    pub fn area(&self) -> Option<BoundingArea> {
        self.0.filter(|a| !a.is_empty())
    }
}
