//! Animator components driven by the animation systems.
//!
//! Every animator implements [`Animatable`], the seam used by
//! [`crate::systems::animation::drive_animators`]. An animator either follows
//! the shared [`AnimationLoop`](crate::resources::animationloop::AnimationLoop)
//! rate (one [`Animatable::next_frame`] per pushed frame) or, when the entity
//! carries an enabled [`FrameRateOverride`], accumulates time at its own rate
//! through [`Animatable::increment_time`].

use std::sync::Arc;

use bevy_ecs::component::Mutable;
use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

use crate::components::animation::{AnimationDefinition, LoopKind, SpriteAnimation};
use crate::components::animationqueue::AnimationQueue;

/// Behavior shared by all animator components.
pub trait Animatable: Component<Mutability = Mutable> {
    /// Disabled animators are skipped by the drivers.
    fn is_enabled(&self) -> bool;

    /// Advances by elapsed time at the given frame period.
    fn increment_time(&mut self, milliseconds: f64, milliseconds_per_frame: f64);

    /// Advances exactly one frame.
    fn next_frame(&mut self);

    /// Sprite to display, `None` when nothing is playing.
    fn current_sprite_index(&self) -> Option<u8>;

    /// Names of the animations that finished since the last call.
    fn drain_finished(&mut self) -> SmallVec<[String; 2]> {
        SmallVec::new()
    }
}

/// Per-entity frame rate that bypasses the shared animation loop.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRateOverride {
    pub frame_rate: u32,
    pub enabled: bool,
}

impl FrameRateOverride {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate,
            enabled: true,
        }
    }

    /// Zero when the frame rate is zero.
    pub fn milliseconds_per_frame(&self) -> f64 {
        if self.frame_rate == 0 {
            0.0
        } else {
            1000.0 / self.frame_rate as f64
        }
    }
}

/// Plays a single animation with its own [`LoopKind`].
///
/// Non-looping kinds stop playback when the end is reached.
#[derive(Component, Clone, Debug)]
pub struct SpriteAnimator {
    playback: Option<SpriteAnimation>,
    pub enabled: bool,
    is_playing: bool,
    finished: SmallVec<[String; 2]>,
}

impl Default for SpriteAnimator {
    fn default() -> Self {
        Self {
            playback: None,
            enabled: true,
            is_playing: false,
            finished: SmallVec::new(),
        }
    }
}

impl SpriteAnimator {
    pub fn new(definition: Arc<AnimationDefinition>, loop_kind: LoopKind) -> Self {
        let mut animator = Self::default();
        animator.play(definition, loop_kind);
        animator
    }

    /// Replaces the current animation and starts it.
    pub fn play(&mut self, definition: Arc<AnimationDefinition>, loop_kind: LoopKind) {
        if let Some(previous) = self.playback.take() {
            if self.is_playing {
                self.finished.push(previous.name().to_string());
            }
        }
        self.playback = Some(SpriteAnimation::new(definition, loop_kind));
        self.is_playing = true;
    }

    /// Pauses and rewinds.
    pub fn stop(&mut self) {
        self.is_playing = false;
        if let Some(playback) = self.playback.as_mut() {
            playback.restart();
        }
    }

    pub fn resume(&mut self) {
        self.is_playing = self.playback.is_some();
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback(&self) -> Option<&SpriteAnimation> {
        self.playback.as_ref()
    }

    pub fn playback_mut(&mut self) -> Option<&mut SpriteAnimation> {
        self.playback.as_mut()
    }

    fn on_advanced(&mut self, is_over: bool) {
        if is_over {
            self.is_playing = false;
            if let Some(playback) = self.playback.as_ref() {
                self.finished.push(playback.name().to_string());
            }
        }
    }
}

impl Animatable for SpriteAnimator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn increment_time(&mut self, milliseconds: f64, milliseconds_per_frame: f64) {
        if !self.is_playing {
            return;
        }
        let is_over = self
            .playback
            .as_mut()
            .is_some_and(|p| p.update(milliseconds, milliseconds_per_frame));
        self.on_advanced(is_over);
    }

    fn next_frame(&mut self) {
        if !self.is_playing {
            return;
        }
        let is_over = self.playback.as_mut().is_some_and(|p| p.try_next_frame());
        self.on_advanced(is_over);
    }

    fn current_sprite_index(&self) -> Option<u8> {
        self.playback.as_ref().and_then(|p| p.current_sprite_index())
    }

    fn drain_finished(&mut self) -> SmallVec<[String; 2]> {
        std::mem::take(&mut self.finished)
    }
}

/// Animator backed by an [`AnimationQueue`].
#[derive(Component, Clone, Debug)]
pub struct QueueableSpriteAnimator {
    pub queue: AnimationQueue,
    pub enabled: bool,
}

impl Default for QueueableSpriteAnimator {
    fn default() -> Self {
        Self {
            queue: AnimationQueue::new(),
            enabled: true,
        }
    }
}

impl QueueableSpriteAnimator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Animatable for QueueableSpriteAnimator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn increment_time(&mut self, milliseconds: f64, milliseconds_per_frame: f64) {
        self.queue.update(milliseconds, milliseconds_per_frame);
    }

    fn next_frame(&mut self) {
        self.queue.next_frame();
    }

    fn current_sprite_index(&self) -> Option<u8> {
        self.queue.current_sprite_index()
    }

    fn drain_finished(&mut self) -> SmallVec<[String; 2]> {
        self.queue.drain_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, steps: usize) -> Arc<AnimationDefinition> {
        let mut d = AnimationDefinition::new(name);
        for i in 0..steps {
            d.add_step(i as u8 + 10, 1);
        }
        Arc::new(d)
    }

    #[test]
    fn test_frame_rate_override_period() {
        assert_eq!(FrameRateOverride::new(20).milliseconds_per_frame(), 50.0);
        assert_eq!(FrameRateOverride::new(0).milliseconds_per_frame(), 0.0);
    }

    #[test]
    fn test_sprite_animator_stops_at_end() {
        let mut a = SpriteAnimator::new(def("jump", 2), LoopKind::None);
        assert_eq!(a.current_sprite_index(), Some(10));
        a.next_frame();
        assert_eq!(a.current_sprite_index(), Some(11));
        a.next_frame();
        assert!(!a.is_playing());
        assert_eq!(a.drain_finished().as_slice(), ["jump".to_string()]);
        a.next_frame();
        assert!(a.drain_finished().is_empty());
        assert_eq!(a.current_sprite_index(), Some(11));
    }

    #[test]
    fn test_sprite_animator_repeats_without_finishing() {
        let mut a = SpriteAnimator::new(def("run", 2), LoopKind::Repeating);
        for _ in 0..10 {
            a.next_frame();
        }
        assert!(a.is_playing());
        assert!(a.drain_finished().is_empty());
    }

    #[test]
    fn test_sprite_animator_time_based() {
        let mut a = SpriteAnimator::new(def("run", 3), LoopKind::Repeating);
        a.increment_time(25.0, 10.0);
        assert_eq!(a.current_sprite_index(), Some(12));
        assert_eq!(a.playback().map(|p| p.milliseconds_passed()), Some(5.0));
    }

    #[test]
    fn test_sprite_animator_play_replaces() {
        let mut a = SpriteAnimator::new(def("a", 2), LoopKind::Repeating);
        a.play(def("b", 2), LoopKind::None);
        assert_eq!(a.drain_finished().as_slice(), ["a".to_string()]);
        assert_eq!(a.playback().map(|p| p.name()), Some("b"));
    }

    #[test]
    fn test_queueable_animator_delegates() {
        let mut a = QueueableSpriteAnimator::new();
        a.queue.play(def("a", 1), false);
        a.queue.enqueue(def("b", 2), false);
        a.next_frame();
        assert_eq!(a.current_sprite_index(), Some(10));
        assert_eq!(a.drain_finished().as_slice(), ["a".to_string()]);
    }
}
