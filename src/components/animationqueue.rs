//! FIFO of pending sprite animations.
//!
//! [`AnimationQueue`] layers "play now" and "play after" semantics on top of
//! [`SpriteAnimation`]. Exactly one playback state is active at a time. The
//! pending entries wait in a FIFO and are promoted when the active one
//! finishes.
//!
//! Every playback state that stops being active through completion,
//! interruption or a hard stop produces one finished notification. The names
//! are collected in an outbox; [`crate::systems::animation::emit_animation_finished`]
//! turns them into [`AnimationFinishedEvent`](crate::events::animation::AnimationFinishedEvent)
//! triggers.

use std::collections::VecDeque;
use std::sync::Arc;

use log::debug;
use smallvec::SmallVec;

use crate::components::animation::{AnimationDefinition, LoopKind, SpriteAnimation};

/// Playback state waiting in (or promoted from) the queue.
#[derive(Debug, Clone)]
pub struct QueuedAnimation {
    pub animation: SpriteAnimation,
    /// Restart instead of finishing when nothing else is queued.
    pub loop_indefinitely: bool,
}

impl QueuedAnimation {
    fn new(definition: Arc<AnimationDefinition>, loop_indefinitely: bool) -> Self {
        Self {
            animation: SpriteAnimation::new(definition, LoopKind::None),
            loop_indefinitely,
        }
    }
}

/// Pending animations plus the active one.
#[derive(Debug, Clone)]
pub struct AnimationQueue {
    queue: VecDeque<QueuedAnimation>,
    active: Option<QueuedAnimation>,
    is_playing: bool,
    finished: SmallVec<[String; 2]>,
}

impl Default for AnimationQueue {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            active: None,
            is_playing: true,
            finished: SmallVec::new(),
        }
    }
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an animation after everything already queued.
    pub fn enqueue(&mut self, definition: Arc<AnimationDefinition>, loop_indefinitely: bool) {
        self.queue
            .push_back(QueuedAnimation::new(definition, loop_indefinitely));
    }

    /// Drops the queue and starts `definition` immediately.
    pub fn play(&mut self, definition: Arc<AnimationDefinition>, loop_indefinitely: bool) {
        self.queue.clear();
        if let Some(previous) = self.active.take() {
            self.finish(previous);
        }
        debug!("animation queue: playing '{}'", definition.name);
        self.active = Some(QueuedAnimation::new(definition, loop_indefinitely));
        self.is_playing = true;
    }

    /// Pauses playback.
    ///
    /// With `erase_queue` the active state finishes and the queue is cleared.
    /// Otherwise the active state is rewound and kept so [`Self::resume`]
    /// starts it over.
    pub fn stop(&mut self, erase_queue: bool) {
        self.is_playing = false;
        if erase_queue {
            if let Some(active) = self.active.take() {
                self.finish(active);
            }
            self.queue.clear();
        } else if let Some(active) = self.active.as_mut() {
            active.animation.restart();
        }
    }

    pub fn resume(&mut self) {
        self.is_playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Active playback state, promoting the head of the queue if idle.
    pub fn current_animation(&mut self) -> Option<&mut QueuedAnimation> {
        if self.active.is_none() {
            self.active = self.queue.pop_front();
        }
        self.active.as_mut()
    }

    pub fn active(&self) -> Option<&QueuedAnimation> {
        self.active.as_ref()
    }

    /// Sprite of the active state, or of the next queued one when idle.
    pub fn current_sprite_index(&self) -> Option<u8> {
        self.active
            .as_ref()
            .or_else(|| self.queue.front())
            .and_then(|q| q.animation.current_sprite_index())
    }

    /// Time based advance. Returns true if a playback state finished.
    pub fn update(&mut self, milliseconds: f64, milliseconds_per_frame: f64) -> bool {
        if !self.is_playing {
            return false;
        }
        let Some(active) = self.current_animation() else {
            return false;
        };
        if active.animation.update(milliseconds, milliseconds_per_frame) {
            self.handle_animation_finished();
            return true;
        }
        false
    }

    /// Discrete one-frame advance. Returns true if a playback state finished.
    pub fn next_frame(&mut self) -> bool {
        if !self.is_playing {
            return false;
        }
        let Some(active) = self.current_animation() else {
            return false;
        };
        if active.animation.try_next_frame() {
            self.handle_animation_finished();
            return true;
        }
        false
    }

    /// Called when the active state reaches its end.
    ///
    /// Promotes the next queued entry (carrying the leftover milliseconds),
    /// restarts a looping entry when nothing is queued, or clears the active
    /// slot.
    pub fn handle_animation_finished(&mut self) {
        let Some(mut outgoing) = self.active.take() else {
            return;
        };
        let leftover = outgoing.animation.milliseconds_passed();
        if let Some(mut next) = self.queue.pop_front() {
            next.animation.reset(0, 0, leftover);
            debug!(
                "animation queue: '{}' -> '{}'",
                outgoing.animation.name(),
                next.animation.name()
            );
            self.active = Some(next);
            self.finish(outgoing);
        } else if outgoing.loop_indefinitely {
            outgoing.animation.reset(0, 0, leftover);
            self.active = Some(outgoing);
        } else {
            self.finish(outgoing);
        }
    }

    /// Takes every finished notification collected since the last drain.
    pub fn drain_finished(&mut self) -> SmallVec<[String; 2]> {
        std::mem::take(&mut self.finished)
    }

    fn finish(&mut self, outgoing: QueuedAnimation) {
        self.finished.push(outgoing.animation.name().to_string());
    }
}
