//! Render gating flags.

use bevy_ecs::prelude::Component;

/// Whether an entity takes part in rendering.
///
/// `render_out_of_bounds` keeps the entity in the spatial index even when its
/// bounds lie outside the scene bounds.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    pub enabled: bool,
    pub visible: bool,
    pub render_out_of_bounds: bool,
}

impl Visibility {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    pub fn is_shown(&self) -> bool {
        self.enabled && self.visible
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            render_out_of_bounds: false,
        }
    }
}
