//! Per-frame rebuild of the spatial index.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::boundingarea::Bounds;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::scrollingsprite::ScrollingSpriteRenderer;
use crate::components::sprite::{SpriteRenderer, SpriteTransform};
use crate::components::visibility::Visibility;
use crate::resources::rendersettings::RenderSettings;
use crate::resources::scenebounds::SceneBounds;
use crate::resources::spatialindex::SpatialIndex;
use crate::resources::spritesheetstore::SpriteSheetStore;
use crate::systems::bounds::{renderer_of, resolve_bounds};

/// Rebuild the [`SpatialIndex`] from every renderable entity.
///
/// The index is recreated with new bounds when [`SceneBounds`] changed and
/// cleared otherwise. Entities with empty bounds are skipped. In a bounded
/// scene only entities overlapping the scene bounds, or flagged
/// `render_out_of_bounds`, are inserted.
#[allow(clippy::type_complexity)]
pub fn rebuild_spatial_index(
    scene: Res<SceneBounds>,
    mut index: ResMut<SpatialIndex>,
    store: Res<SpriteSheetStore>,
    settings: Res<RenderSettings>,
    query: Query<(
        Entity,
        &Bounds,
        &MapPosition,
        Option<&Rotation>,
        Option<&Scale>,
        Option<&SpriteRenderer>,
        Option<&ScrollingSpriteRenderer>,
        Option<&Visibility>,
    )>,
) {
    if scene.is_changed() {
        *index = SpatialIndex::new(scene.area());
        debug!(
            "Spatial index recreated ({})",
            if index.is_bounded() { "bounded" } else { "unbounded" }
        );
    } else {
        index.clear();
    }

    for (entity, bounds, position, rotation, scale, sprite, scrolling, visibility) in query.iter() {
        let Some(renderer) = renderer_of(sprite, scrolling) else {
            continue;
        };
        let transform = SpriteTransform::from_components(position, rotation, scale);
        let area = resolve_bounds(bounds, renderer, &transform, &store, settings.pixels_per_unit);
        let out_of_bounds = visibility.is_some_and(|v| v.render_out_of_bounds);
        if index.accepts(&area, out_of_bounds) {
            index.insert(area, entity);
        }
    }
}
