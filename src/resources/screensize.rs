//! Viewport size resource.
//!
//! Stores the pixel size cameras render into. Camera views are recomputed
//! when it changes.

use bevy_ecs::prelude::Resource;

/// Viewport size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Width over height, 1.0 for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.h <= 0 {
            1.0
        } else {
            self.w as f32 / self.h as f32
        }
    }
}
