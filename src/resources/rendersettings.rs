//! Render settings shared by all cameras.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Color;
use rustc_hash::FxHashMap;

use crate::components::renderpriority::RenderPriority;
use crate::resources::gameconfig::GameConfig;

#[derive(Resource, Debug, Clone)]
pub struct RenderSettings {
    /// Texture pixels per world unit.
    pub pixels_per_unit: f32,
    /// Default for cameras that do not set their own snapping.
    pub snap_to_pixels: bool,
    priority_colors: FxHashMap<RenderPriority, Color>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            pixels_per_unit: 16.0,
            snap_to_pixels: true,
            priority_colors: FxHashMap::default(),
        }
    }
}

impl RenderSettings {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            pixels_per_unit: config.pixels_per_unit,
            snap_to_pixels: config.snap_to_pixels,
            priority_colors: config
                .priority_colors
                .iter()
                .map(|(p, c)| (*p, *c))
                .collect(),
        }
    }

    /// Flat color replacing every sprite tint in `priority`, if configured.
    pub fn debug_color(&self, priority: RenderPriority) -> Option<Color> {
        self.priority_colors.get(&priority).copied()
    }

    pub fn set_debug_color(&mut self, priority: RenderPriority, color: Option<Color>) {
        match color {
            Some(color) => {
                self.priority_colors.insert(priority, color);
            }
            None => {
                self.priority_colors.remove(&priority);
            }
        }
    }
}
