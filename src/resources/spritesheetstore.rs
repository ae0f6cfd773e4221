//! Sprite sheet registry.
//!
//! A [`SpriteSheet`] describes a grid of equally sized sprites inside one
//! texture plus the named animations authored against it. The store only
//! holds metadata; textures are resolved by key when a batch is flushed, so
//! animation and culling work without a GPU context.
//!
//! Sheets can be described in JSON:
//!
//! ```json
//! {
//!   "texture": "hero",
//!   "columns": 4,
//!   "rows": 2,
//!   "sprite_width": 16,
//!   "sprite_height": 16,
//!   "animations": [
//!     { "name": "walk", "steps": [ { "sprite_index": 0, "frames": 3 } ] }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{debug, info};
use raylib::prelude::{Rectangle, Vector2};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::components::animation::AnimationDefinition;

/// Failures resolving or loading sprite assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unknown sprite sheet '{0}'")]
    UnknownSheet(String),
    #[error("sprite sheet '{sheet}' has no animation '{animation}'")]
    UnknownAnimation { sheet: String, animation: String },
    #[error("malformed sprite sheet description: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct SpriteSheetDescription {
    texture: String,
    columns: u32,
    rows: u32,
    sprite_width: u32,
    sprite_height: u32,
    #[serde(default)]
    animations: Vec<AnimationDefinition>,
}

/// Grid of sprites in one texture and the animations that use it.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    /// Key of the texture in the renderer's texture store.
    pub texture: Arc<str>,
    pub columns: u32,
    pub rows: u32,
    pub sprite_width: u32,
    pub sprite_height: u32,
    animations: FxHashMap<String, Arc<AnimationDefinition>>,
}

impl SpriteSheet {
    pub fn new(
        texture: impl Into<Arc<str>>,
        columns: u32,
        rows: u32,
        sprite_width: u32,
        sprite_height: u32,
    ) -> Self {
        Self {
            texture: texture.into(),
            columns,
            rows,
            sprite_width,
            sprite_height,
            animations: FxHashMap::default(),
        }
    }

    pub fn sprite_count(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn sprite_size(&self) -> Vector2 {
        Vector2 {
            x: self.sprite_width as f32,
            y: self.sprite_height as f32,
        }
    }

    /// Texture region of sprite `index`, row major. `None` when out of range.
    pub fn source_rect(&self, index: u8) -> Option<Rectangle> {
        let index = index as u32;
        if index >= self.sprite_count() {
            return None;
        }
        Some(Rectangle {
            x: ((index % self.columns) * self.sprite_width) as f32,
            y: ((index / self.columns) * self.sprite_height) as f32,
            width: self.sprite_width as f32,
            height: self.sprite_height as f32,
        })
    }

    /// Registers an animation, freezing it for sharing.
    pub fn add_animation(&mut self, definition: AnimationDefinition) -> Arc<AnimationDefinition> {
        let definition = Arc::new(definition);
        self.animations
            .insert(definition.name.clone(), Arc::clone(&definition));
        definition
    }

    pub fn animation(&self, name: &str) -> Option<Arc<AnimationDefinition>> {
        self.animations.get(name).cloned()
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }
}

/// All loaded sprite sheets keyed by name.
#[derive(Resource, Debug, Default, Clone)]
pub struct SpriteSheetStore {
    sheets: FxHashMap<String, SpriteSheet>,
}

impl SpriteSheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, sheet: SpriteSheet) {
        let name = name.into();
        debug!("Registered sprite sheet '{}'", name);
        self.sheets.insert(name, sheet);
    }

    pub fn get(&self, name: &str) -> Option<&SpriteSheet> {
        self.sheets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Parses a JSON sheet description and registers it under `name`.
    pub fn load_json(&mut self, name: &str, json: &str) -> Result<(), AssetError> {
        let description: SpriteSheetDescription = serde_json::from_str(json)?;
        let mut sheet = SpriteSheet::new(
            description.texture,
            description.columns.max(1),
            description.rows.max(1),
            description.sprite_width,
            description.sprite_height,
        );
        for animation in description.animations {
            sheet.add_animation(animation);
        }
        info!(
            "Loaded sprite sheet '{}' ({} animations)",
            name,
            sheet.animations.len()
        );
        self.insert(name, sheet);
        Ok(())
    }

    pub fn load_file(&mut self, name: &str, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_json(name, &json)
    }

    /// Looks up a shared animation definition.
    pub fn animation(
        &self,
        sheet: &str,
        animation: &str,
    ) -> Result<Arc<AnimationDefinition>, AssetError> {
        let sprite_sheet = self
            .get(sheet)
            .ok_or_else(|| AssetError::UnknownSheet(sheet.to_string()))?;
        sprite_sheet
            .animation(animation)
            .ok_or_else(|| AssetError::UnknownAnimation {
                sheet: sheet.to_string(),
                animation: animation.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "texture": "hero",
        "columns": 4,
        "rows": 2,
        "sprite_width": 16,
        "sprite_height": 24,
        "animations": [
            { "name": "walk", "steps": [
                { "sprite_index": 0, "frames": 3 },
                { "sprite_index": 5, "frames": 0 }
            ] }
        ]
    }"#;

    #[test]
    fn test_load_json() {
        let mut store = SpriteSheetStore::new();
        store.load_json("hero", SHEET).unwrap();
        let sheet = store.get("hero").unwrap();
        assert_eq!(&*sheet.texture, "hero");
        assert_eq!(sheet.sprite_count(), 8);
        let walk = store.animation("hero", "walk").unwrap();
        assert_eq!(walk.len(), 2);
        assert_eq!(walk.step(1).map(|s| s.frames()), Some(1));
    }

    #[test]
    fn test_source_rect_row_major() {
        let sheet = SpriteSheet::new("t", 4, 2, 16, 24);
        let r = sheet.source_rect(5).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), (16.0, 24.0, 16.0, 24.0));
        assert!(sheet.source_rect(8).is_none());
    }

    #[test]
    fn test_lookup_errors() {
        let mut store = SpriteSheetStore::new();
        store.load_json("hero", SHEET).unwrap();
        assert!(matches!(
            store.animation("villain", "walk"),
            Err(AssetError::UnknownSheet(_))
        ));
        assert!(matches!(
            store.animation("hero", "fly"),
            Err(AssetError::UnknownAnimation { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let mut store = SpriteSheetStore::new();
        assert!(matches!(
            store.load_json("bad", "{ not json"),
            Err(AssetError::Malformed(_))
        ));
        assert!(!store.contains("bad"));
    }

    #[test]
    fn test_missing_file() {
        let mut store = SpriteSheetStore::new();
        let err = store.load_file("x", "/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
