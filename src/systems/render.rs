//! Render dispatch.
//!
//! For every camera, in ascending render order:
//!
//! 1. compute (or reuse) the camera view from its position and the viewport;
//! 2. query the [`SpatialIndex`] with the view bounds;
//! 3. keep entities that should render and whose [`Layers`] the camera accepts
//!    (exclusion wins over inclusion);
//! 4. sort by [`RenderPriority`], then [`RenderOrder`], then entity id;
//! 5. draw into one sprite batch per camera. A camera color override paints
//!    everything flat; otherwise a debug color configured for a priority band
//!    replaces the [`Tint`] of every entity in that band.
//!
//! Draws are recorded into the [`RenderQueue`] resource, which the game loop
//! replays into a GPU batch. Entities whose sprite sheet is missing are
//! skipped without affecting the rest of the batch.

use bevy_ecs::prelude::*;
use log::trace;
use raylib::prelude::{Color, Vector2};

use crate::components::camera::Camera;
use crate::components::layers::Layers;
use crate::components::mapposition::MapPosition;
use crate::components::renderorder::RenderOrder;
use crate::components::renderpriority::RenderPriority;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::scrollingsprite::ScrollingSpriteRenderer;
use crate::components::sprite::{SpriteRenderer, SpriteTransform};
use crate::components::tint::Tint;
use crate::components::visibility::Visibility;
use crate::resources::rendersettings::RenderSettings;
use crate::resources::screensize::ScreenSize;
use crate::resources::spatialindex::SpatialIndex;
use crate::resources::spritebatch::{BatchSettings, RenderQueue, SpriteBatch};
use crate::resources::spritesheetstore::SpriteSheetStore;
use crate::systems::bounds::renderer_of;

type RenderableData = (
    &'static MapPosition,
    Option<&'static Rotation>,
    Option<&'static Scale>,
    Option<&'static SpriteRenderer>,
    Option<&'static ScrollingSpriteRenderer>,
    Option<&'static Layers>,
    Option<&'static RenderOrder>,
    Option<&'static RenderPriority>,
    Option<&'static Tint>,
    Option<&'static Visibility>,
);

/// Sort key and draw color of an eligible entity.
#[derive(Clone, Copy, Debug)]
struct DrawItem {
    priority: RenderPriority,
    order: RenderOrder,
    entity: Entity,
    tint: Color,
}

pub fn render_dispatch(
    mut queue: ResMut<RenderQueue>,
    index: Res<SpatialIndex>,
    store: Res<SpriteSheetStore>,
    settings: Res<RenderSettings>,
    screen: Res<ScreenSize>,
    cameras: Query<(Entity, &Camera, Option<&MapPosition>)>,
    renderables: Query<RenderableData>,
) {
    queue.clear();

    let mut ordered_cameras: Vec<_> = cameras.iter().collect();
    ordered_cameras.sort_by_key(|(entity, camera, _)| (camera.render_order(), *entity));

    for (_, camera, position) in ordered_cameras {
        let position = position.map_or(Vector2::zero(), |p| p.pos);
        let view = camera.view(position, *screen, &settings);

        let mut items: Vec<DrawItem> = index
            .query(&view.bounds)
            .into_iter()
            .filter_map(|entity| {
                let (_, _, _, sprite, scrolling, layers, order, priority, tint, visibility) =
                    renderables.get(entity).ok()?;
                let renderer = renderer_of(sprite, scrolling)?;
                let shown = visibility.is_none_or(|v| v.is_shown());
                let layers = layers.copied().unwrap_or_default();
                (shown && renderer.has_sprite() && camera.accepts(layers)).then(|| DrawItem {
                    priority: priority.copied().unwrap_or_default(),
                    order: order.copied().unwrap_or_default(),
                    entity,
                    tint: tint.map_or(Color::WHITE, |t| t.color),
                })
            })
            .collect();
        items.sort_by_key(|item| (item.priority, item.order, item.entity));

        let batch: &mut RenderQueue = &mut queue;
        batch.begin(&BatchSettings {
            camera: view.camera2d,
            sampler: camera.sampler(),
            shader: camera.shader().cloned(),
        });

        match camera.color_override() {
            Some(color) => {
                for item in &items {
                    draw_entity(batch, &renderables, &store, &settings, item.entity, color);
                }
            }
            None => {
                for group in items.chunk_by(|a, b| a.priority == b.priority) {
                    let debug_color = settings.debug_color(group[0].priority);
                    for item in group {
                        let color = debug_color.unwrap_or(item.tint);
                        draw_entity(batch, &renderables, &store, &settings, item.entity, color);
                    }
                }
            }
        }

        batch.end();
    }
}

fn draw_entity(
    batch: &mut dyn SpriteBatch,
    renderables: &Query<RenderableData>,
    store: &SpriteSheetStore,
    settings: &RenderSettings,
    entity: Entity,
    color: Color,
) {
    let Ok((position, rotation, scale, sprite, scrolling, ..)) = renderables.get(entity) else {
        return;
    };
    let Some(renderer) = renderer_of(sprite, scrolling) else {
        return;
    };
    let Some(sheet) = store.get(renderer.sheet()) else {
        trace!("{:?}: sprite sheet '{}' not loaded", entity, renderer.sheet());
        return;
    };
    let transform = SpriteTransform::from_components(position, rotation, scale);
    renderer.render(sheet, &transform, settings.pixels_per_unit, color, batch);
}
