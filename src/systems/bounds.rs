//! Cache invalidation for entity bounds and camera views.
//!
//! [`Bounds`] and the camera view are memoized. These systems drop the cached
//! values whenever an input changed since they last ran, so the next read
//! recomputes them.

use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

use crate::components::boundingarea::{BoundingArea, Bounds};
use crate::components::camera::Camera;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::scrollingsprite::ScrollingSpriteRenderer;
use crate::components::sprite::{Renderable, SpriteRenderer, SpriteTransform};
use crate::resources::rendersettings::RenderSettings;
use crate::resources::screensize::ScreenSize;
use crate::resources::spritesheetstore::SpriteSheetStore;

/// The renderer component of an entity, preferring [`SpriteRenderer`].
pub fn renderer_of<'a>(
    sprite: Option<&'a SpriteRenderer>,
    scrolling: Option<&'a ScrollingSpriteRenderer>,
) -> Option<&'a dyn Renderable> {
    match (sprite, scrolling) {
        (Some(sprite), _) => Some(sprite),
        (None, Some(scrolling)) => Some(scrolling),
        (None, None) => None,
    }
}

/// Cached bounds of a renderer, computing them on a miss.
///
/// A renderer whose sheet is missing has empty bounds.
pub fn resolve_bounds(
    bounds: &Bounds,
    renderer: &dyn Renderable,
    transform: &SpriteTransform,
    store: &SpriteSheetStore,
    pixels_per_unit: f32,
) -> BoundingArea {
    bounds.get_or_compute(|| match store.get(renderer.sheet()) {
        Some(sheet) => renderer.bounding_area(sheet, transform, pixels_per_unit),
        None => BoundingArea::EMPTY,
    })
}

#[allow(clippy::type_complexity)]
pub fn invalidate_bounds(
    mut query: Query<(
        Entity,
        &mut Bounds,
        Option<Ref<MapPosition>>,
        Option<Ref<Rotation>>,
        Option<Ref<Scale>>,
        Option<Ref<SpriteRenderer>>,
        Option<Ref<ScrollingSpriteRenderer>>,
    )>,
    mut removed_rotations: RemovedComponents<Rotation>,
    mut removed_scales: RemovedComponents<Scale>,
    settings: Res<RenderSettings>,
    store: Res<SpriteSheetStore>,
) {
    let invalidate_all = settings.is_changed() || store.is_changed();
    let removed: FxHashSet<Entity> = removed_rotations
        .read()
        .chain(removed_scales.read())
        .collect();

    for (entity, mut bounds, position, rotation, scale, sprite, scrolling) in query.iter_mut() {
        if bounds.cached().is_none() {
            continue;
        }
        let changed = invalidate_all
            || removed.contains(&entity)
            || position.is_some_and(|c| c.is_changed())
            || rotation.is_some_and(|c| c.is_changed())
            || scale.is_some_and(|c| c.is_changed())
            || sprite.is_some_and(|c| c.is_changed())
            || scrolling.is_some_and(|c| c.is_changed());
        if changed {
            bounds.invalidate();
        }
    }
}

/// Drop camera views whose position, the viewport, or the render settings changed.
pub fn invalidate_camera_views(
    mut cameras: Query<(&mut Camera, Option<Ref<MapPosition>>)>,
    screen: Res<ScreenSize>,
    settings: Res<RenderSettings>,
) {
    let invalidate_all = screen.is_changed() || settings.is_changed();
    for (mut camera, position) in cameras.iter_mut() {
        if !camera.has_cached_view() {
            continue;
        }
        if invalidate_all || position.is_some_and(|p| p.is_changed()) {
            camera.invalidate_view();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritesheetstore::SpriteSheet;

    fn make_world() -> World {
        let mut world = World::new();
        let mut store = SpriteSheetStore::new();
        store.insert("s", SpriteSheet::new("tex", 1, 1, 16, 16));
        world.insert_resource(store);
        world.insert_resource(RenderSettings::default());
        world.insert_resource(ScreenSize::new(160, 160));
        world
    }

    fn cache_bounds(world: &mut World, e: Entity) -> BoundingArea {
        let store = world.resource::<SpriteSheetStore>().clone();
        let position = *world.get::<MapPosition>(e).unwrap();
        let renderer = world.get::<SpriteRenderer>(e).unwrap().clone();
        let bounds = world.get::<Bounds>(e).unwrap();
        resolve_bounds(
            bounds,
            &renderer,
            &SpriteTransform::from_components(&position, None, None),
            &store,
            16.0,
        )
    }

    #[test]
    fn test_renderer_requires_bounds() {
        let mut world = make_world();
        let e = world.spawn(SpriteRenderer::new("s", 0)).id();
        assert!(world.get::<Bounds>(e).is_some());
    }

    #[test]
    fn test_position_change_invalidates() {
        let mut world = make_world();
        let e = world
            .spawn((MapPosition::new(0.0, 0.0), SpriteRenderer::new("s", 0)))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(invalidate_bounds);
        schedule.run(&mut world);

        let first = cache_bounds(&mut world, e);
        assert_eq!(first.min.x, 0.0);

        schedule.run(&mut world);
        assert!(world.get::<Bounds>(e).unwrap().cached().is_some());

        world.get_mut::<MapPosition>(e).unwrap().pos.x = 5.0;
        schedule.run(&mut world);
        assert!(world.get::<Bounds>(e).unwrap().cached().is_none());
        assert_eq!(cache_bounds(&mut world, e).min.x, 5.0);
    }

    #[test]
    fn test_missing_sheet_is_empty() {
        let store = SpriteSheetStore::new();
        let bounds = Bounds::new();
        let area = resolve_bounds(
            &bounds,
            &SpriteRenderer::new("nope", 0),
            &SpriteTransform::default(),
            &store,
            16.0,
        );
        assert!(area.is_empty());
    }

    #[test]
    fn test_camera_view_invalidated_by_position_and_screen() {
        let mut world = make_world();
        let e = world.spawn((Camera::new(10.0), MapPosition::new(0.0, 0.0))).id();
        let mut schedule = Schedule::default();
        schedule.add_systems(invalidate_camera_views);
        schedule.run(&mut world);

        let settings = world.resource::<RenderSettings>().clone();
        world
            .get::<Camera>(e)
            .unwrap()
            .view(raylib::prelude::Vector2::zero(), ScreenSize::new(160, 160), &settings);
        schedule.run(&mut world);
        assert!(world.get::<Camera>(e).unwrap().has_cached_view());

        world.resource_mut::<ScreenSize>().w = 320;
        schedule.run(&mut world);
        assert!(!world.get::<Camera>(e).unwrap().has_cached_view());
    }
}
