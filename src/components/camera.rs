//! Camera component.
//!
//! A [`Camera`] renders the entities whose layers it accepts into the
//! viewport. Its world-space view is derived from the entity's
//! [`MapPosition`](crate::components::mapposition::MapPosition), the viewport
//! size and the [`RenderSettings`], and cached in a [`Memo`] until one of
//! those inputs changes.
//!
//! World space is y-down, like screen space.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use raylib::prelude::{Camera2D, Color, Vector2};

use crate::components::boundingarea::BoundingArea;
use crate::components::layers::Layers;
use crate::memo::Memo;
use crate::resources::rendersettings::RenderSettings;
use crate::resources::screensize::ScreenSize;
use crate::resources::spritebatch::SamplerState;

pub const DEFAULT_VIEW_HEIGHT: f32 = 10.0;

/// Viewport point the camera position maps to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// Anchor position as a fraction of the viewport size.
    pub fn fraction(self) -> Vector2 {
        let (x, y) = match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::Top => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::Left => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::Right => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::Bottom => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        };
        Vector2 { x, y }
    }
}

/// Where the camera sits in the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffsetOptions {
    pub anchor: Anchor,
    /// World-space offset added to the camera position.
    pub offset: Vector2,
}

/// Derived view state of a camera.
#[derive(Clone, Copy, Debug)]
pub struct CameraView {
    pub camera2d: Camera2D,
    /// World-space area visible through the camera.
    pub bounds: BoundingArea,
    /// World units covered vertically after zoom snapping.
    pub actual_view_height: f32,
    pub view_width: f32,
    /// Screen pixels per world unit.
    pub zoom: f32,
}

#[derive(Component, Clone, Debug)]
pub struct Camera {
    view_height: f32,
    offset: OffsetOptions,
    layers_to_render: Layers,
    layers_to_exclude: Layers,
    render_order: i32,
    sampler: SamplerState,
    shader: Option<Arc<str>>,
    color_override: Option<Color>,
    snap_to_pixels: Option<bool>,
    view: Memo<CameraView>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view_height: DEFAULT_VIEW_HEIGHT,
            offset: OffsetOptions::default(),
            layers_to_render: Layers::all(),
            layers_to_exclude: Layers::empty(),
            render_order: 0,
            sampler: SamplerState::default(),
            shader: None,
            color_override: None,
            snap_to_pixels: None,
            view: Memo::new(),
        }
    }
}

impl Camera {
    /// Camera showing `view_height` world units vertically.
    pub fn new(view_height: f32) -> Self {
        let mut camera = Self::default();
        camera.set_view_height(view_height);
        camera
    }

    pub fn view_height(&self) -> f32 {
        self.view_height
    }

    /// Non-positive or non-finite heights fall back to the default.
    pub fn set_view_height(&mut self, view_height: f32) {
        self.view_height = if view_height.is_finite() && view_height > 0.0 {
            view_height
        } else {
            DEFAULT_VIEW_HEIGHT
        };
        self.view.invalidate();
    }

    pub fn offset(&self) -> OffsetOptions {
        self.offset
    }

    pub fn set_offset(&mut self, offset: OffsetOptions) {
        self.offset = offset;
        self.view.invalidate();
    }

    pub fn layers_to_render(&self) -> Layers {
        self.layers_to_render
    }

    pub fn set_layers_to_render(&mut self, layers: Layers) {
        self.layers_to_render = layers;
        self.view.invalidate();
    }

    pub fn layers_to_exclude(&self) -> Layers {
        self.layers_to_exclude
    }

    pub fn set_layers_to_exclude(&mut self, layers: Layers) {
        self.layers_to_exclude = layers;
        self.view.invalidate();
    }

    pub fn render_order(&self) -> i32 {
        self.render_order
    }

    pub fn set_render_order(&mut self, render_order: i32) {
        self.render_order = render_order;
        self.view.invalidate();
    }

    pub fn sampler(&self) -> SamplerState {
        self.sampler
    }

    pub fn set_sampler(&mut self, sampler: SamplerState) {
        self.sampler = sampler;
    }

    pub fn shader(&self) -> Option<&Arc<str>> {
        self.shader.as_ref()
    }

    pub fn set_shader(&mut self, shader: Option<Arc<str>>) {
        self.shader = shader;
    }

    pub fn color_override(&self) -> Option<Color> {
        self.color_override
    }

    pub fn set_color_override(&mut self, color: Option<Color>) {
        self.color_override = color;
    }

    /// Overrides [`RenderSettings::snap_to_pixels`] for this camera.
    pub fn set_snap_to_pixels(&mut self, snap: Option<bool>) {
        self.snap_to_pixels = snap;
        self.view.invalidate();
    }

    /// Exclusion wins over inclusion.
    pub fn accepts(&self, layers: Layers) -> bool {
        !layers.intersects(self.layers_to_exclude) && layers.intersects(self.layers_to_render)
    }

    /// Drops the cached view. Called when the position or viewport changes.
    pub fn invalidate_view(&mut self) {
        self.view.invalidate();
    }

    pub fn has_cached_view(&self) -> bool {
        self.view.is_valid()
    }

    /// Cached view, computed on first access after invalidation.
    pub fn view(
        &self,
        position: Vector2,
        viewport: ScreenSize,
        settings: &RenderSettings,
    ) -> CameraView {
        *self
            .view
            .get_or_compute(|| self.compute_view(position, viewport, settings))
    }

    fn compute_view(
        &self,
        position: Vector2,
        viewport: ScreenSize,
        settings: &RenderSettings,
    ) -> CameraView {
        let viewport_w = viewport.w.max(1) as f32;
        let viewport_h = viewport.h.max(1) as f32;

        let mut zoom = viewport_h / self.view_height;
        let ppu = settings.pixels_per_unit;
        if self.snap_to_pixels.unwrap_or(settings.snap_to_pixels) && ppu > 0.0 {
            zoom = ppu * (zoom / ppu).round().max(1.0);
        }

        let actual_view_height = viewport_h / zoom;
        let view_width = actual_view_height * viewport.aspect_ratio();
        let anchor = self.offset.anchor.fraction();
        let target = Vector2 {
            x: position.x + self.offset.offset.x,
            y: position.y + self.offset.offset.y,
        };
        let min = Vector2 {
            x: target.x - anchor.x * view_width,
            y: target.y - anchor.y * actual_view_height,
        };

        CameraView {
            camera2d: Camera2D {
                offset: Vector2 {
                    x: anchor.x * viewport_w,
                    y: anchor.y * viewport_h,
                },
                target,
                rotation: 0.0,
                zoom,
            },
            bounds: BoundingArea::from_xywh(min.x, min.y, view_width, actual_view_height),
            actual_view_height,
            view_width,
            zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(ppu: f32, snap: bool) -> RenderSettings {
        RenderSettings {
            pixels_per_unit: ppu,
            snap_to_pixels: snap,
            ..Default::default()
        }
    }

    #[test]
    fn test_unsnapped_view() {
        let camera = Camera::new(10.0);
        let view = camera.view(
            Vector2::new(0.0, 0.0),
            ScreenSize::new(200, 100),
            &settings(16.0, false),
        );
        assert_eq!(view.zoom, 10.0);
        assert_eq!(view.actual_view_height, 10.0);
        assert_eq!(view.view_width, 20.0);
        assert_eq!(view.bounds.min.x, -10.0);
        assert_eq!(view.bounds.min.y, -5.0);
        assert_eq!(view.bounds.max.x, 10.0);
        assert_eq!(view.camera2d.offset.x, 100.0);
        assert_eq!(view.camera2d.offset.y, 50.0);
    }

    #[test]
    fn test_snapped_zoom_is_multiple_of_ppu() {
        let camera = Camera::new(10.0);
        // 360 / 10 = 36 px per unit, snapped to 32 with 16 ppu.
        let view = camera.view(Vector2::zero(), ScreenSize::new(640, 360), &settings(16.0, true));
        assert_eq!(view.zoom, 32.0);
        assert_eq!(view.actual_view_height, 11.25);
    }

    #[test]
    fn test_snap_never_below_one_texel_per_pixel() {
        let camera = Camera::new(100.0);
        let view = camera.view(Vector2::zero(), ScreenSize::new(320, 180), &settings(16.0, true));
        assert_eq!(view.zoom, 16.0);
    }

    #[test]
    fn test_top_left_anchor_and_offset() {
        let mut camera = Camera::new(10.0);
        camera.set_offset(OffsetOptions {
            anchor: Anchor::TopLeft,
            offset: Vector2::new(1.0, 2.0),
        });
        let view = camera.view(
            Vector2::new(5.0, 5.0),
            ScreenSize::new(100, 100),
            &settings(16.0, false),
        );
        assert_eq!(view.bounds.min.x, 6.0);
        assert_eq!(view.bounds.min.y, 7.0);
        assert_eq!(view.camera2d.offset.x, 0.0);
        assert_eq!(view.camera2d.target.x, 6.0);
    }

    #[test]
    fn test_view_is_cached_until_invalidated() {
        let mut camera = Camera::new(10.0);
        let s = settings(16.0, false);
        let first = camera.view(Vector2::zero(), ScreenSize::new(100, 100), &s);
        let stale = camera.view(Vector2::new(50.0, 0.0), ScreenSize::new(100, 100), &s);
        assert_eq!(first.bounds, stale.bounds);
        camera.invalidate_view();
        let fresh = camera.view(Vector2::new(50.0, 0.0), ScreenSize::new(100, 100), &s);
        assert_eq!(fresh.bounds.min.x, 45.0);
    }

    #[test]
    fn test_setters_invalidate() {
        let mut camera = Camera::new(10.0);
        camera.view(Vector2::zero(), ScreenSize::new(100, 100), &settings(16.0, false));
        assert!(camera.has_cached_view());
        camera.set_view_height(20.0);
        assert!(!camera.has_cached_view());
        camera.view(Vector2::zero(), ScreenSize::new(100, 100), &settings(16.0, false));
        camera.set_layers_to_exclude(Layers::LAYER_1);
        assert!(!camera.has_cached_view());
    }

    #[test]
    fn test_invalid_view_height_uses_default() {
        let camera = Camera::new(-3.0);
        assert_eq!(camera.view_height(), DEFAULT_VIEW_HEIGHT);
    }

    #[test]
    fn test_exclusion_wins() {
        let mut camera = Camera::default();
        camera.set_layers_to_render(Layers::DEFAULT | Layers::LAYER_1);
        camera.set_layers_to_exclude(Layers::LAYER_1);
        assert!(camera.accepts(Layers::DEFAULT));
        assert!(!camera.accepts(Layers::DEFAULT | Layers::LAYER_1));
        assert!(!camera.accepts(Layers::LAYER_2));
    }
}
