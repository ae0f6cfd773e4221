//! Sprite rotation.

use bevy_ecs::prelude::Component;

/// Clockwise rotation around the sprite origin, in degrees.
///
/// Changing it invalidates the entity's cached bounds.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn new(degrees: f32) -> Self {
        Self { degrees }
    }
}
