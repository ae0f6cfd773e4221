//! Animation lifecycle events.
//!
//! Animators collect the names of animations that stop being active
//! (completed, interrupted by `play`, or hard-stopped). The
//! [`emit_animation_finished`](crate::systems::animation::emit_animation_finished)
//! system triggers one [`AnimationFinishedEvent`] per name.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<AnimationFinishedEvent>| {
//!     log::info!("{:?} finished {}", trigger.entity, trigger.animation);
//! });
//! ```

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AnimationFinishedEvent {
    /// The animated entity.
    pub entity: Entity,
    /// Name of the animation that finished.
    pub animation: String,
}
