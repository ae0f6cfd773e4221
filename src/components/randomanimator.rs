//! Animators with randomized playback.
//!
//! Both variants own a [`fastrand::Rng`] so a seeded generator can be
//! injected for reproducible runs.

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::components::animation::{AnimationDefinition, LoopKind, SpriteAnimation};
use crate::components::animator::Animatable;

/// Holds each step for its frame count, then jumps to a different random step.
#[derive(Component, Clone, Debug)]
pub struct RandomFrameSpriteAnimator {
    animation: Arc<AnimationDefinition>,
    step_index: usize,
    frame_index: u32,
    milliseconds_passed: f64,
    rng: fastrand::Rng,
    pub enabled: bool,
}

impl RandomFrameSpriteAnimator {
    pub fn new(animation: Arc<AnimationDefinition>, rng: fastrand::Rng) -> Self {
        Self {
            animation,
            step_index: 0,
            frame_index: 0,
            milliseconds_passed: 0.0,
            rng,
            enabled: true,
        }
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    fn pick_next_step(&mut self) {
        let count = self.animation.len();
        if count < 2 {
            return;
        }
        // Draw from count - 1 slots and skip over the current one.
        let mut next = self.rng.usize(0..count - 1);
        if next >= self.step_index {
            next += 1;
        }
        self.step_index = next;
    }
}

impl Animatable for RandomFrameSpriteAnimator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn increment_time(&mut self, milliseconds: f64, milliseconds_per_frame: f64) {
        if milliseconds_per_frame <= 0.0 {
            return;
        }
        self.milliseconds_passed += milliseconds.max(0.0);
        while self.milliseconds_passed >= milliseconds_per_frame {
            self.milliseconds_passed -= milliseconds_per_frame;
            self.next_frame();
        }
    }

    fn next_frame(&mut self) {
        let Some(step) = self.animation.step(self.step_index) else {
            return;
        };
        self.frame_index += 1;
        if self.frame_index >= step.frames() {
            self.frame_index = 0;
            self.pick_next_step();
        }
    }

    fn current_sprite_index(&self) -> Option<u8> {
        self.animation
            .step(self.step_index)
            .map(|step| step.sprite_index)
    }
}

/// Plays an animation once, idles on its first sprite for a random number of
/// frames, then plays it again.
#[derive(Component, Clone, Debug)]
pub struct RandomLoopingSpriteAnimator {
    playback: SpriteAnimation,
    min_idle_frames: u32,
    max_idle_frames: u32,
    idle_frames_remaining: u32,
    milliseconds_passed: f64,
    rng: fastrand::Rng,
    pub enabled: bool,
}

impl RandomLoopingSpriteAnimator {
    /// Idle bounds are inclusive and swapped if given out of order.
    pub fn new(
        animation: Arc<AnimationDefinition>,
        min_idle_frames: u32,
        max_idle_frames: u32,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            playback: SpriteAnimation::new(animation, LoopKind::None),
            min_idle_frames: min_idle_frames.min(max_idle_frames),
            max_idle_frames: max_idle_frames.max(min_idle_frames),
            idle_frames_remaining: 0,
            milliseconds_passed: 0.0,
            rng,
            enabled: true,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle_frames_remaining > 0
    }

    pub fn idle_frames_remaining(&self) -> u32 {
        self.idle_frames_remaining
    }

    pub fn playback(&self) -> &SpriteAnimation {
        &self.playback
    }
}

impl Animatable for RandomLoopingSpriteAnimator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn increment_time(&mut self, milliseconds: f64, milliseconds_per_frame: f64) {
        if milliseconds_per_frame <= 0.0 {
            return;
        }
        self.milliseconds_passed += milliseconds.max(0.0);
        while self.milliseconds_passed >= milliseconds_per_frame {
            self.milliseconds_passed -= milliseconds_per_frame;
            self.next_frame();
        }
    }

    fn next_frame(&mut self) {
        if self.idle_frames_remaining > 0 {
            self.idle_frames_remaining -= 1;
            return;
        }
        if self.playback.try_next_frame() {
            self.playback.restart();
            self.idle_frames_remaining = self
                .rng
                .u32(self.min_idle_frames..=self.max_idle_frames);
        }
    }

    fn current_sprite_index(&self) -> Option<u8> {
        self.playback.current_sprite_index()
    }
}
