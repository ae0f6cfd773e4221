//! Animation systems.
//!
//! Run once per update tick, in this order:
//!
//! 1. [`advance_animation_loop`] turns the tick duration into whole frames on
//!    the shared [`AnimationLoop`].
//! 2. [`drive_animators`] advances every animator of one type. Entities with
//!    an enabled [`FrameRateOverride`] accumulate time at their own rate; all
//!    others receive exactly [`AnimationLoop::frames_pushed`] discrete frame
//!    pushes so they stay in lockstep.
//! 3. [`sync_animated_sprites`] copies the animator's sprite index into the
//!    [`SpriteRenderer`].
//! 4. [`emit_animation_finished`] triggers an [`AnimationFinishedEvent`] for
//!    every animation that stopped being active.
//!
//! Steps 2 to 4 are generic over the [`Animatable`] component; register them
//! once per animator type (see [`crate::game::build_update_schedule`]).

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::animator::{Animatable, FrameRateOverride};
use crate::components::layers::Layers;
use crate::components::sprite::SpriteRenderer;
use crate::events::animation::AnimationFinishedEvent;
use crate::resources::animationloop::AnimationLoop;
use crate::resources::worldtime::FrameTime;

/// Accumulate this tick's milliseconds into the shared animation loop.
pub fn advance_animation_loop(time: Res<FrameTime>, mut animation_loop: ResMut<AnimationLoop>) {
    let pushed = animation_loop.consume(time.milliseconds_passed);
    if pushed > 1 {
        trace!("animation loop pushed {} frames in one tick", pushed);
    }
}

/// Advance every enabled animator of type `T`.
///
/// Entities outside [`AnimationLoop::layers_override`] are skipped. Entities
/// without a [`Layers`] component count as [`Layers::DEFAULT`].
pub fn drive_animators<T: Animatable>(
    mut query: Query<(&mut T, Option<&FrameRateOverride>, Option<&Layers>)>,
    animation_loop: Res<AnimationLoop>,
    time: Res<FrameTime>,
) {
    let frames_pushed = animation_loop.frames_pushed();
    for (mut animator, frame_rate_override, layers) in query.iter_mut() {
        if !animator.is_enabled() || !animation_loop.drives(layers.copied().unwrap_or_default()) {
            continue;
        }
        match frame_rate_override.filter(|o| o.enabled) {
            Some(frame_rate) => {
                animator.increment_time(
                    time.milliseconds_passed,
                    frame_rate.milliseconds_per_frame(),
                );
            }
            None => {
                for _ in 0..frames_pushed {
                    animator.next_frame();
                }
            }
        }
    }
}

/// Show the animator's current sprite on the entity's renderer.
///
/// Writes only when the index differs so renderer change detection (and the
/// bounds invalidation hanging off it) fires only on real changes.
pub fn sync_animated_sprites<T: Animatable>(
    mut query: Query<(&T, &mut SpriteRenderer), Changed<T>>,
) {
    for (animator, mut renderer) in query.iter_mut() {
        let index = animator.current_sprite_index();
        if renderer.sprite_index != index {
            renderer.sprite_index = index;
        }
    }
}

/// Trigger an [`AnimationFinishedEvent`] per finished animation name.
pub fn emit_animation_finished<T: Animatable>(
    mut query: Query<(Entity, &mut T), Changed<T>>,
    mut commands: Commands,
) {
    for (entity, mut animator) in query.iter_mut() {
        for animation in animator.bypass_change_detection().drain_finished() {
            trace!("{:?} finished animation '{}'", entity, animation);
            commands.trigger(AnimationFinishedEvent { entity, animation });
        }
    }
}
