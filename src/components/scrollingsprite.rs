//! Sprite renderer whose texture scrolls and wraps inside the sprite area.
//!
//! The scroll offset shifts which texel is shown at each point of the sprite:
//! the texel at local `(x, y)` is `((x + ox) mod w, (y + oy) mod h)`. Drawing
//! that needs up to four pieces, one per combination of right/left and
//! bottom/top part of the texture.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle, Vector2};
use smallvec::SmallVec;

use crate::components::boundingarea::Bounds;
use crate::components::sprite::{
    Renderable, SpriteLayout, SpriteRegion, SpriteTransform, draw_sprite_region,
};
use crate::resources::spritebatch::SpriteBatch;
use crate::resources::spritesheetstore::SpriteSheet;

#[derive(Component, Clone, Debug)]
#[require(Bounds)]
pub struct ScrollingSpriteRenderer {
    pub sheet: Arc<str>,
    pub sprite_index: Option<u8>,
    pub origin: Vector2,
    /// Current scroll offset in pixels. Any value is valid.
    pub offset: Vector2,
    /// Pixels per second added to `offset` by the scroll system.
    pub scroll_speed: Vector2,
}

impl ScrollingSpriteRenderer {
    pub fn new(sheet: impl Into<Arc<str>>, sprite_index: u8, scroll_speed: Vector2) -> Self {
        Self {
            sheet: sheet.into(),
            sprite_index: Some(sprite_index),
            origin: Vector2::zero(),
            offset: Vector2::zero(),
            scroll_speed,
        }
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vector2 { x, y };
        self
    }

    pub fn scroll(&mut self, seconds: f32) {
        self.offset.x += self.scroll_speed.x * seconds;
        self.offset.y += self.scroll_speed.y * seconds;
    }
}

/// Wrapped offset in `[0, size)`, 0 for a degenerate size.
fn wrap(offset: f32, size: f32) -> f32 {
    if size <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let wrapped = offset.rem_euclid(size);
    // rem_euclid may round up to `size` for tiny negative inputs.
    if wrapped >= size { 0.0 } else { wrapped }
}

/// Splits `sprite` (a texture rect) into the pieces that draw it scrolled by
/// `offset`. The regions tile the sprite area exactly.
pub fn scroll_pieces(sprite: Rectangle, offset: Vector2) -> SmallVec<[SpriteRegion; 4]> {
    let w = sprite.width;
    let h = sprite.height;
    let sx = wrap(offset.x, w);
    let sy = wrap(offset.y, h);

    // (texture start, local start, length) along each axis.
    let columns = [(sx, 0.0, w - sx), (0.0, w - sx, sx)];
    let rows = [(sy, 0.0, h - sy), (0.0, h - sy, sy)];

    let mut pieces = SmallVec::new();
    for &(ty, ly, lh) in &rows {
        if lh <= 0.0 {
            continue;
        }
        for &(tx, lx, lw) in &columns {
            if lw <= 0.0 {
                continue;
            }
            pieces.push(SpriteRegion {
                source: Rectangle {
                    x: sprite.x + tx,
                    y: sprite.y + ty,
                    width: lw,
                    height: lh,
                },
                offset: Vector2 { x: lx, y: ly },
            });
        }
    }
    pieces
}

impl Renderable for ScrollingSpriteRenderer {
    fn sheet(&self) -> &str {
        &self.sheet
    }

    fn sprite_index(&self) -> Option<u8> {
        self.sprite_index
    }

    fn layout(&self, sheet: &SpriteSheet) -> SpriteLayout {
        SpriteLayout {
            size: sheet.sprite_size(),
            origin: self.origin,
            flip_h: false,
            flip_v: false,
        }
    }

    fn render(
        &self,
        sheet: &SpriteSheet,
        transform: &SpriteTransform,
        pixels_per_unit: f32,
        color: Color,
        batch: &mut dyn SpriteBatch,
    ) {
        let Some(source) = self.sprite_index.and_then(|i| sheet.source_rect(i)) else {
            return;
        };
        let layout = self.layout(sheet);
        for region in scroll_pieces(source, self.offset) {
            draw_sprite_region(
                batch,
                &sheet.texture,
                region,
                &layout,
                transform,
                pixels_per_unit,
                color,
            );
        }
    }
}
