//! Sprite renderer and the drawing helpers shared by every renderer.
//!
//! A renderer component picks a sprite out of a
//! [`SpriteSheet`](crate::resources::spritesheetstore::SpriteSheet). The
//! entity's [`MapPosition`] is the pivot; `origin` is the pivot in sprite
//! pixels. World size is the sprite size divided by
//! [`RenderSettings::pixels_per_unit`](crate::resources::rendersettings::RenderSettings),
//! times the entity scale.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle, Vector2};

use crate::components::boundingarea::{BoundingArea, Bounds};
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::resources::spritebatch::{SpriteBatch, SpriteDraw};
use crate::resources::spritesheetstore::SpriteSheet;

/// World placement of a renderer.
#[derive(Clone, Copy, Debug)]
pub struct SpriteTransform {
    pub position: Vector2,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub scale: Vector2,
}

impl Default for SpriteTransform {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            rotation: 0.0,
            scale: Vector2 { x: 1.0, y: 1.0 },
        }
    }
}

impl SpriteTransform {
    pub fn from_components(
        position: &MapPosition,
        rotation: Option<&Rotation>,
        scale: Option<&Scale>,
    ) -> Self {
        Self {
            position: position.pos,
            rotation: rotation.map_or(0.0, |r| r.degrees),
            scale: scale.map_or(Vector2 { x: 1.0, y: 1.0 }, |s| s.scale),
        }
    }
}

/// Sprite geometry in texture pixels.
#[derive(Clone, Copy, Debug)]
pub struct SpriteLayout {
    pub size: Vector2,
    pub origin: Vector2,
    pub flip_h: bool,
    pub flip_v: bool,
}

/// Part of a sprite: a texture region and where it sits inside the sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRegion {
    pub source: Rectangle,
    /// Top-left of the region inside the sprite, in pixels.
    pub offset: Vector2,
}

/// Effective flips once negative scale is folded in.
fn effective_flips(layout: &SpriteLayout, transform: &SpriteTransform) -> (bool, bool) {
    (
        layout.flip_h ^ (transform.scale.x < 0.0),
        layout.flip_v ^ (transform.scale.y < 0.0),
    )
}

fn world_scale(transform: &SpriteTransform, pixels_per_unit: f32) -> Vector2 {
    let ppu = if pixels_per_unit > 0.0 {
        pixels_per_unit
    } else {
        1.0
    };
    Vector2 {
        x: transform.scale.x.abs() / ppu,
        y: transform.scale.y.abs() / ppu,
    }
}

/// Pivot in pixels after mirroring.
fn mirrored_origin(layout: &SpriteLayout, flip_h: bool, flip_v: bool) -> Vector2 {
    Vector2 {
        x: if flip_h {
            layout.size.x - layout.origin.x
        } else {
            layout.origin.x
        },
        y: if flip_v {
            layout.size.y - layout.origin.y
        } else {
            layout.origin.y
        },
    }
}

/// World-space bounds of the rotated, scaled sprite rectangle.
pub fn sprite_bounds(
    layout: &SpriteLayout,
    transform: &SpriteTransform,
    pixels_per_unit: f32,
) -> BoundingArea {
    let (flip_h, flip_v) = effective_flips(layout, transform);
    let origin = mirrored_origin(layout, flip_h, flip_v);
    let s = world_scale(transform, pixels_per_unit);
    let left = -origin.x * s.x;
    let top = -origin.y * s.y;
    let right = (layout.size.x - origin.x) * s.x;
    let bottom = (layout.size.y - origin.y) * s.y;

    let (sin, cos) = transform.rotation.to_radians().sin_cos();
    let corners = [(left, top), (right, top), (right, bottom), (left, bottom)].map(|(x, y)| {
        Vector2 {
            x: transform.position.x + x * cos - y * sin,
            y: transform.position.y + x * sin + y * cos,
        }
    });
    BoundingArea::from_points(&corners)
}

/// Queues one region of a sprite, rotated around the entity pivot.
pub fn draw_sprite_region(
    batch: &mut dyn SpriteBatch,
    texture: &Arc<str>,
    region: SpriteRegion,
    layout: &SpriteLayout,
    transform: &SpriteTransform,
    pixels_per_unit: f32,
    color: Color,
) {
    let (flip_h, flip_v) = effective_flips(layout, transform);
    let origin = mirrored_origin(layout, flip_h, flip_v);
    let s = world_scale(transform, pixels_per_unit);

    let mut source = region.source;
    let mut offset = region.offset;
    if flip_h {
        offset.x = layout.size.x - region.offset.x - region.source.width;
        source.width = -source.width;
    }
    if flip_v {
        offset.y = layout.size.y - region.offset.y - region.source.height;
        source.height = -source.height;
    }

    batch.draw(SpriteDraw {
        texture: Arc::clone(texture),
        source,
        dest: Rectangle {
            x: transform.position.x,
            y: transform.position.y,
            width: region.source.width * s.x,
            height: region.source.height * s.y,
        },
        origin: Vector2 {
            x: (origin.x - offset.x) * s.x,
            y: (origin.y - offset.y) * s.y,
        },
        rotation: transform.rotation,
        color,
    });
}

/// Capability shared by renderer components.
pub trait Renderable {
    /// Name of the sprite sheet in the store.
    fn sheet(&self) -> &str;

    /// Sprite currently shown, `None` when nothing is drawable.
    fn sprite_index(&self) -> Option<u8>;

    fn layout(&self, sheet: &SpriteSheet) -> SpriteLayout;

    /// Queues the draw calls for this renderer.
    fn render(
        &self,
        sheet: &SpriteSheet,
        transform: &SpriteTransform,
        pixels_per_unit: f32,
        color: Color,
        batch: &mut dyn SpriteBatch,
    );

    fn has_sprite(&self) -> bool {
        self.sprite_index().is_some()
    }

    fn bounding_area(
        &self,
        sheet: &SpriteSheet,
        transform: &SpriteTransform,
        pixels_per_unit: f32,
    ) -> BoundingArea {
        if !self.has_sprite() {
            return BoundingArea::EMPTY;
        }
        sprite_bounds(&self.layout(sheet), transform, pixels_per_unit)
    }
}

/// Draws one sprite of a sheet.
#[derive(Component, Clone, Debug)]
#[require(Bounds)]
pub struct SpriteRenderer {
    pub sheet: Arc<str>,
    pub sprite_index: Option<u8>,
    /// Pivot in sprite pixels, from the top-left corner.
    pub origin: Vector2,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl SpriteRenderer {
    pub fn new(sheet: impl Into<Arc<str>>, sprite_index: u8) -> Self {
        Self {
            sheet: sheet.into(),
            sprite_index: Some(sprite_index),
            origin: Vector2::zero(),
            flip_h: false,
            flip_v: false,
        }
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vector2 { x, y };
        self
    }
}

impl Renderable for SpriteRenderer {
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
            flip_h: self.flip_h,
            flip_v: self.flip_v,
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
        draw_sprite_region(
            batch,
            &sheet.texture,
            SpriteRegion {
                source,
                offset: Vector2::zero(),
            },
            &self.layout(sheet),
            transform,
            pixels_per_unit,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritebatch::RenderQueue;

    fn sheet() -> SpriteSheet {
        SpriteSheet::new("tex", 4, 4, 16, 32)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_bounds_from_origin_and_ppu() {
        let r = SpriteRenderer::new("s", 0).with_origin(8.0, 32.0);
        let t = SpriteTransform {
            position: Vector2::new(10.0, 10.0),
            ..Default::default()
        };
        let b = r.bounding_area(&sheet(), &t, 16.0);
        assert_eq!(b.min.x, 9.5);
        assert_eq!(b.min.y, 8.0);
        assert_eq!(b.max.x, 10.5);
        assert_eq!(b.max.y, 10.0);
    }

    #[test]
    fn test_bounds_rotated_quarter_turn() {
        let r = SpriteRenderer::new("s", 0);
        let t = SpriteTransform {
            rotation: 90.0,
            ..Default::default()
        };
        let b = r.bounding_area(&sheet(), &t, 16.0);
        assert!(approx(b.min.x, -2.0));
        assert!(approx(b.max.x, 0.0));
        assert!(approx(b.min.y, 0.0));
        assert!(approx(b.max.y, 1.0));
    }

    #[test]
    fn test_bounds_scaled_and_mirrored() {
        let r = SpriteRenderer::new("s", 0).with_origin(4.0, 0.0);
        let t = SpriteTransform {
            scale: Vector2::new(-2.0, 1.0),
            ..Default::default()
        };
        let b = r.bounding_area(&sheet(), &t, 16.0);
        // Mirrored pivot sits 12 px from the left edge.
        assert!(approx(b.min.x, -1.5));
        assert!(approx(b.max.x, 0.5));
    }

    #[test]
    fn test_no_sprite_has_empty_bounds() {
        let mut r = SpriteRenderer::new("s", 0);
        r.sprite_index = None;
        assert!(!r.has_sprite());
        assert!(r.bounding_area(&sheet(), &SpriteTransform::default(), 16.0).is_empty());
    }

    #[test]
    fn test_render_emits_one_draw() {
        let r = SpriteRenderer::new("s", 5).with_origin(8.0, 16.0);
        let mut q = RenderQueue::new();
        let t = SpriteTransform {
            position: Vector2::new(3.0, 4.0),
            rotation: 45.0,
            ..Default::default()
        };
        r.render(&sheet(), &t, 16.0, Color::RED, &mut q);
        let draws: Vec<_> = q.draws().collect();
        assert_eq!(draws.len(), 1);
        let d = draws[0];
        assert_eq!(&*d.texture, "tex");
        assert_eq!(d.source.x, 16.0);
        assert_eq!(d.source.y, 32.0);
        assert_eq!(d.dest.x, 3.0);
        assert_eq!(d.dest.width, 1.0);
        assert_eq!(d.dest.height, 2.0);
        assert_eq!(d.origin.x, 0.5);
        assert_eq!(d.origin.y, 1.0);
        assert_eq!(d.rotation, 45.0);
    }

    #[test]
    fn test_flip_negates_source_width() {
        let mut r = SpriteRenderer::new("s", 0);
        r.flip_h = true;
        let mut q = RenderQueue::new();
        r.render(&sheet(), &SpriteTransform::default(), 16.0, Color::WHITE, &mut q);
        let d = q.draws().next().unwrap();
        assert_eq!(d.source.width, -16.0);
        assert_eq!(d.origin.x, 1.0);
    }

    #[test]
    fn test_out_of_range_sprite_is_skipped() {
        let r = SpriteRenderer::new("s", 200);
        let mut q = RenderQueue::new();
        r.render(&sheet(), &SpriteTransform::default(), 16.0, Color::WHITE, &mut q);
        assert_eq!(q.draws().count(), 0);
    }
}
