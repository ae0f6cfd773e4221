//! World setup, schedules and the demo scene.
//!
//! [`insert_resources`] fills a [`World`] with every resource the systems
//! read. [`build_update_schedule`] advances animation and scrolling;
//! [`build_render_schedule`] invalidates cached geometry, rebuilds the spatial
//! index and records the frame into the [`RenderQueue`]. Run them in that order once per tick,
//! after [`crate::systems::time::update_frame_time`].

use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::prelude::{Color, Vector2};

use crate::components::animation::{AnimationDefinition, LoopKind};
use crate::components::animator::{FrameRateOverride, QueueableSpriteAnimator, SpriteAnimator};
use crate::components::camera::{Camera, DEFAULT_VIEW_HEIGHT};
use crate::components::layers::Layers;
use crate::components::mapposition::MapPosition;
use crate::components::randomanimator::{RandomFrameSpriteAnimator, RandomLoopingSpriteAnimator};
use crate::components::renderorder::RenderOrder;
use crate::components::renderpriority::RenderPriority;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::scrollingsprite::ScrollingSpriteRenderer;
use crate::components::sprite::SpriteRenderer;
use crate::components::tint::Tint;
use crate::resources::animationloop::AnimationLoop;
use crate::resources::gameconfig::GameConfig;
use crate::resources::rendersettings::RenderSettings;
use crate::resources::scenebounds::SceneBounds;
use crate::resources::screensize::ScreenSize;
use crate::resources::spatialindex::SpatialIndex;
use crate::resources::spritebatch::RenderQueue;
use crate::resources::spritesheetstore::{AssetError, SpriteSheet, SpriteSheetStore};
use crate::resources::worldtime::FrameTime;
use crate::systems::animation::{
    advance_animation_loop, drive_animators, emit_animation_finished, sync_animated_sprites,
};
use crate::systems::bounds::{invalidate_bounds, invalidate_camera_views};
use crate::systems::render::render_dispatch;
use crate::systems::scroll::scroll_sprites;
use crate::systems::spatial::rebuild_spatial_index;

/// Name of the generated sprite sheet (and its texture) used by the demo.
pub const DEMO_SHEET: &str = "demo";
pub const DEMO_SPRITE_SIZE: u32 = 16;
pub const DEMO_COLUMNS: u32 = 4;
pub const DEMO_ROWS: u32 = 2;

/// Inserts the resources the update and render schedules read.
pub fn insert_resources(world: &mut World, config: &GameConfig) {
    let (render_width, render_height) = config.render_size();
    world.insert_resource(FrameTime::default());
    world.insert_resource(AnimationLoop::new(config.frame_rate));
    world.insert_resource(RenderSettings::from_config(config));
    world.insert_resource(ScreenSize::new(render_width as i32, render_height as i32));
    world.insert_resource(SceneBounds::default());
    world.insert_resource(SpatialIndex::default());
    world.insert_resource(SpriteSheetStore::new());
    world.insert_resource(RenderQueue::new());
    world.insert_resource(config.clone());
    debug!(
        "World resources ready: frame_rate={}, viewport {}x{}",
        config.frame_rate, render_width, render_height
    );
}

/// Seeded generator when a seed is configured, otherwise seeded from entropy.
pub fn make_rng(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}

/// Animation systems for every animator type, then scrolling.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            advance_animation_loop,
            (
                drive_animators::<SpriteAnimator>,
                drive_animators::<QueueableSpriteAnimator>,
                drive_animators::<RandomFrameSpriteAnimator>,
                drive_animators::<RandomLoopingSpriteAnimator>,
            ),
            (
                sync_animated_sprites::<SpriteAnimator>,
                sync_animated_sprites::<QueueableSpriteAnimator>,
                sync_animated_sprites::<RandomFrameSpriteAnimator>,
                sync_animated_sprites::<RandomLoopingSpriteAnimator>,
            ),
            (
                emit_animation_finished::<SpriteAnimator>,
                emit_animation_finished::<QueueableSpriteAnimator>,
                emit_animation_finished::<RandomFrameSpriteAnimator>,
                emit_animation_finished::<RandomLoopingSpriteAnimator>,
            ),
            scroll_sprites,
        )
            .chain(),
    );
    update
}

/// Cache invalidation, index rebuild and dispatch.
///
/// Invalidation runs here so a render without a preceding update still sees
/// the latest transforms.
pub fn build_render_schedule() -> Schedule {
    let mut render = Schedule::default();
    render.add_systems(
        (
            (invalidate_bounds, invalidate_camera_views),
            rebuild_spatial_index,
            render_dispatch,
        )
            .chain(),
    );
    render
}

/// Sprite sheet of the generated demo texture and its animations.
///
/// Sprites 0 to 3 form a spin cycle, 4 and 5 a blink, 6 an idle pose and 7
/// the background tile.
pub fn demo_sprite_sheet() -> SpriteSheet {
    let mut sheet = SpriteSheet::new(
        DEMO_SHEET,
        DEMO_COLUMNS,
        DEMO_ROWS,
        DEMO_SPRITE_SIZE,
        DEMO_SPRITE_SIZE,
    );
    sheet.add_animation(
        AnimationDefinition::new("spin")
            .with_step(0, 3)
            .with_step(1, 3)
            .with_step(2, 3)
            .with_step(3, 3),
    );
    sheet.add_animation(AnimationDefinition::new("blink").with_step(4, 4).with_step(5, 2));
    sheet.add_animation(AnimationDefinition::new("idle").with_step(6, 8).with_step(0, 8));
    sheet.add_animation(
        AnimationDefinition::new("flicker")
            .with_step(0, 1)
            .with_step(1, 1)
            .with_step(2, 1)
            .with_step(3, 1)
            .with_step(4, 1),
    );
    sheet
}

/// Spawns one entity per animator kind, a scrolling background, the main
/// camera and an overlay camera for [`Layers::LAYER_1`].
pub fn spawn_demo_scene(world: &mut World, rng: &mut fastrand::Rng) -> Result<(), AssetError> {
    world
        .resource_mut::<SpriteSheetStore>()
        .insert(DEMO_SHEET, demo_sprite_sheet());
    let store = world.resource::<SpriteSheetStore>().clone();
    let spin = store.animation(DEMO_SHEET, "spin")?;
    let blink = store.animation(DEMO_SHEET, "blink")?;
    let idle = store.animation(DEMO_SHEET, "idle")?;
    let flicker = store.animation(DEMO_SHEET, "flicker")?;

    let center = DEMO_SPRITE_SIZE as f32 * 0.5;

    let mut main_camera = Camera::new(DEFAULT_VIEW_HEIGHT);
    main_camera.set_layers_to_exclude(Layers::LAYER_1);
    world.spawn((MapPosition::new(0.0, 0.0), main_camera));
    let mut overlay = Camera::new(DEFAULT_VIEW_HEIGHT);
    overlay.set_layers_to_render(Layers::LAYER_1);
    overlay.set_render_order(1);
    world.spawn((MapPosition::new(0.0, 0.0), overlay));

    world.spawn((
        MapPosition::new(0.0, 0.0),
        Scale::uniform(16.0),
        ScrollingSpriteRenderer::new(DEMO_SHEET, 7, Vector2 { x: 6.0, y: 3.0 })
            .with_origin(center, center),
        RenderPriority::Background,
        Layers::LAYER_2,
    ));

    world.spawn((
        MapPosition::new(-3.0, 0.0),
        SpriteRenderer::new(DEMO_SHEET, 0).with_origin(center, center),
        SpriteAnimator::new(spin.clone(), LoopKind::PingPong),
        Layers::LAYER_2,
    ));

    let mut queued = QueueableSpriteAnimator::new();
    queued.queue.play(blink.clone(), false);
    queued.queue.enqueue(spin.clone(), false);
    queued.queue.enqueue(idle, true);
    world.spawn((
        MapPosition::new(-1.0, 0.0),
        SpriteRenderer::new(DEMO_SHEET, 4).with_origin(center, center),
        queued,
        RenderOrder(1),
        Layers::LAYER_2,
    ));

    world.spawn((
        MapPosition::new(1.0, 0.0),
        Rotation::new(45.0),
        SpriteRenderer::new(DEMO_SHEET, 0).with_origin(center, center),
        RandomFrameSpriteAnimator::new(flicker, fastrand::Rng::with_seed(rng.u64(..))),
        FrameRateOverride::new(8),
        Tint::new(255, 200, 200, 255),
        Layers::LAYER_2,
    ));

    world.spawn((
        MapPosition::new(3.0, 0.0),
        SpriteRenderer::new(DEMO_SHEET, 4).with_origin(center, center),
        RandomLoopingSpriteAnimator::new(blink, 15, 60, fastrand::Rng::with_seed(rng.u64(..))),
        Layers::LAYER_2,
    ));

    world.spawn((
        MapPosition::new(0.0, -4.0),
        SpriteRenderer::new(DEMO_SHEET, 6).with_origin(center, 0.0),
        SpriteAnimator::new(spin, LoopKind::RepeatingReverse),
        Tint { color: Color::GOLD },
        RenderPriority::Overlay,
        Layers::LAYER_1,
    ));

    info!("Demo scene spawned");
    Ok(())
}
