//! Sprite animation definitions and playback state.
//!
//! An [`AnimationDefinition`] is an ordered list of [`AnimationStep`]s, each
//! holding one sprite index for a number of frames. [`SpriteAnimation`] walks a
//! definition frame by frame and decides what happens at either end of the
//! sequence according to its [`LoopKind`].
//!
//! Frames advance either from accumulated milliseconds
//! ([`SpriteAnimation::update`]) or one discrete push at a time
//! ([`SpriteAnimation::try_next_frame`]). Both share the same step policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One entry of an animation: a sprite held for `frames` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub sprite_index: u8,
    #[serde(deserialize_with = "deserialize_frames")]
    frames: u32,
}

fn deserialize_frames<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(1, u32::MAX as i64) as u32)
}

impl AnimationStep {
    /// Frame counts below one are coerced to one.
    pub fn new(sprite_index: u8, frames: u32) -> Self {
        Self {
            sprite_index,
            frames: frames.max(1),
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn set_frames(&mut self, frames: u32) {
        self.frames = frames.max(1);
    }
}

/// Ordered steps of a sprite animation.
///
/// Definitions are edited while authoring and shared as
/// `Arc<AnimationDefinition>` once playback starts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationDefinition {
    pub name: String,
    #[serde(default)]
    steps: Vec<AnimationStep>,
}

impl AnimationDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Builder-style append of a step.
    pub fn with_step(mut self, sprite_index: u8, frames: u32) -> Self {
        self.add_step(sprite_index, frames);
        self
    }

    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&AnimationStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn add_step(&mut self, sprite_index: u8, frames: u32) -> usize {
        self.steps.push(AnimationStep::new(sprite_index, frames));
        self.steps.len() - 1
    }

    /// Inserts a step at `index`, or appends when `index` is past the end.
    pub fn insert_step(&mut self, index: usize, sprite_index: u8, frames: u32) -> usize {
        let index = index.min(self.steps.len());
        self.steps
            .insert(index, AnimationStep::new(sprite_index, frames));
        index
    }

    pub fn remove_step(&mut self, index: usize) -> Option<AnimationStep> {
        (index < self.steps.len()).then(|| self.steps.remove(index))
    }

    pub fn set_step_frames(&mut self, index: usize, frames: u32) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.set_frames(frames);
                true
            }
            None => false,
        }
    }

    pub fn set_step_sprite(&mut self, index: usize, sprite_index: u8) -> bool {
        match self.steps.get_mut(index) {
            Some(step) => {
                step.sprite_index = sprite_index;
                true
            }
            None => false,
        }
    }

    /// Sum of the frame counts of every step.
    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }
}

/// What playback does when it reaches either end of the step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopKind {
    /// Play forward once and hold the last step.
    #[default]
    None,
    /// Play backward once and hold the first step.
    NoneReverse,
    /// Play forward and wrap around to the first step.
    Repeating,
    /// Play backward and wrap around to the last step.
    RepeatingReverse,
    /// Bounce between both ends without repeating an end step.
    PingPong,
}

impl LoopKind {
    /// Kinds that start at the last step and walk backward.
    pub fn is_reverse(self) -> bool {
        matches!(self, LoopKind::NoneReverse | LoopKind::RepeatingReverse)
    }

    /// Kinds that never report the animation as over.
    pub fn is_looping(self) -> bool {
        matches!(
            self,
            LoopKind::Repeating | LoopKind::RepeatingReverse | LoopKind::PingPong
        )
    }
}

/// Playback cursor over one [`AnimationDefinition`].
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    animation: Arc<AnimationDefinition>,
    loop_kind: LoopKind,
    step_index: usize,
    frame_index: u32,
    milliseconds_passed: f64,
    reversed: bool,
    current_sprite_index: Option<u8>,
}

impl SpriteAnimation {
    /// Creates a playback state positioned at the natural start for `loop_kind`.
    pub fn new(animation: Arc<AnimationDefinition>, loop_kind: LoopKind) -> Self {
        let mut playback = Self {
            animation,
            loop_kind,
            step_index: 0,
            frame_index: 0,
            milliseconds_passed: 0.0,
            reversed: false,
            current_sprite_index: None,
        };
        playback.restart();
        playback
    }

    pub fn animation(&self) -> &Arc<AnimationDefinition> {
        &self.animation
    }

    pub fn name(&self) -> &str {
        &self.animation.name
    }

    pub fn loop_kind(&self) -> LoopKind {
        self.loop_kind
    }

    /// Changing the loop kind restarts playback.
    pub fn set_loop_kind(&mut self, loop_kind: LoopKind) {
        self.loop_kind = loop_kind;
        self.restart();
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn milliseconds_passed(&self) -> f64 {
        self.milliseconds_passed
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Sprite of the current step, `None` when the animation has no steps.
    pub fn current_sprite_index(&self) -> Option<u8> {
        self.current_sprite_index
    }

    /// Moves the cursor to the first step, or the last one for reverse kinds.
    pub fn restart(&mut self) {
        let start = if self.loop_kind.is_reverse() {
            self.animation.len().saturating_sub(1)
        } else {
            0
        };
        self.reset(start, 0, 0.0);
    }

    /// Repositions the cursor explicitly. Indices are clamped into range.
    pub fn reset(&mut self, step_index: usize, frame_index: u32, milliseconds_passed: f64) {
        let count = self.animation.len();
        self.step_index = step_index.min(count.saturating_sub(1));
        self.frame_index = match self.animation.step(self.step_index) {
            Some(step) => frame_index.min(step.frames - 1),
            None => 0,
        };
        self.milliseconds_passed = milliseconds_passed.max(0.0);
        // Any reverse kind, NoneReverse included, starts walking backwards.
        self.reversed = self.loop_kind.is_reverse();
        self.refresh_sprite_index();
    }

    /// Accumulates `milliseconds` and advances one frame per elapsed
    /// `milliseconds_per_frame`. Returns true if the animation ended during
    /// this update.
    pub fn update(&mut self, milliseconds: f64, milliseconds_per_frame: f64) -> bool {
        if milliseconds_per_frame <= 0.0 {
            return false;
        }
        self.milliseconds_passed += milliseconds.max(0.0);
        let mut is_over = false;
        while self.milliseconds_passed >= milliseconds_per_frame {
            self.milliseconds_passed -= milliseconds_per_frame;
            self.frame_index += 1;
            is_over |= self.try_new_step();
        }
        is_over
    }

    /// Advances exactly one frame. Returns true if the animation is over.
    pub fn try_next_frame(&mut self) -> bool {
        self.frame_index += 1;
        self.try_new_step()
    }

    /// Moves to the neighbouring step once the current one has been held for
    /// its full frame count.
    fn try_new_step(&mut self) -> bool {
        let count = self.animation.len();
        let Some(step) = self.animation.step(self.step_index) else {
            self.current_sprite_index = None;
            return true;
        };

        let mut is_over = false;
        if self.frame_index >= step.frames {
            self.frame_index = 0;
            if self.reversed {
                if self.step_index == 0 {
                    match self.loop_kind {
                        LoopKind::None | LoopKind::NoneReverse => {
                            self.step_index = 0;
                            is_over = true;
                        }
                        LoopKind::Repeating | LoopKind::RepeatingReverse => {
                            self.step_index = count - 1;
                        }
                        LoopKind::PingPong => {
                            self.step_index = 1.min(count - 1);
                            self.reversed = false;
                        }
                    }
                } else {
                    self.step_index -= 1;
                }
            } else if self.step_index + 1 >= count {
                match self.loop_kind {
                    LoopKind::None | LoopKind::NoneReverse => {
                        self.step_index = count - 1;
                        is_over = true;
                    }
                    LoopKind::Repeating | LoopKind::RepeatingReverse => {
                        self.step_index = 0;
                    }
                    LoopKind::PingPong => {
                        self.step_index = count.saturating_sub(2);
                        self.reversed = count > 1;
                    }
                }
            } else {
                self.step_index += 1;
            }
        }

        self.refresh_sprite_index();
        is_over
    }

    fn refresh_sprite_index(&mut self) {
        self.current_sprite_index = self
            .animation
            .step(self.step_index)
            .map(|step| step.sprite_index);
    }

    /// Completion in `[0, 1]` measured in frames from the first step.
    pub fn percentage_complete(&self) -> f32 {
        let total = self.animation.total_frames();
        if total == 0 {
            return 0.0;
        }
        let before: u64 = self.animation.steps()[..self.step_index]
            .iter()
            .map(|s| u64::from(s.frames()))
            .sum();
        ((before + u64::from(self.frame_index)) as f64 / total as f64) as f32
    }

    /// Positions the cursor at the frame closest below `amount` of the total.
    pub fn set_percentage_complete(&mut self, amount: f32) {
        let total = self.animation.total_frames();
        if total == 0 {
            return;
        }
        let amount = if amount.is_nan() {
            0.0
        } else {
            amount.clamp(0.0, 1.0)
        };
        let mut remaining = ((amount as f64 * total as f64).floor() as u64).min(total - 1);
        let mut target = (self.animation.len() - 1, 0);
        for (index, step) in self.animation.steps().iter().enumerate() {
            let frames = u64::from(step.frames());
            if remaining < frames {
                // remaining < frames, so it fits in u32
                target = (index, remaining as u32);
                break;
            }
            remaining -= frames;
        }
        self.step_index = target.0;
        self.frame_index = target.1;
        self.refresh_sprite_index();
    }
}
