//! Shared animation frame clock.
//!
//! The [`AnimationLoop`] turns variable tick lengths into a whole number of
//! frames at a fixed rate. Entities without a frame rate override receive
//! exactly that many discrete frame pushes, which keeps them in lockstep with
//! each other.

use bevy_ecs::prelude::Resource;

use crate::components::layers::Layers;

pub const DEFAULT_FRAME_RATE: u32 = 30;

#[derive(Resource, Debug, Clone)]
pub struct AnimationLoop {
    /// Target frames per second. Zero disables frame pushes.
    pub frame_rate: u32,
    /// Only drive entities sharing one of these layers. `None` drives all.
    pub layers_override: Option<Layers>,
    accumulated_milliseconds: f64,
    frames_pushed: u32,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl AnimationLoop {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate,
            layers_override: None,
            accumulated_milliseconds: 0.0,
            frames_pushed: 0,
        }
    }

    pub fn milliseconds_per_frame(&self) -> f64 {
        if self.frame_rate == 0 {
            0.0
        } else {
            1000.0 / self.frame_rate as f64
        }
    }

    /// Adds the tick duration and returns how many whole frames it completed.
    ///
    /// The remainder carries over to the next call.
    pub fn consume(&mut self, milliseconds: f64) -> u32 {
        self.frames_pushed = 0;
        let period = self.milliseconds_per_frame();
        if period <= 0.0 {
            return 0;
        }
        self.accumulated_milliseconds += milliseconds.max(0.0);
        while self.accumulated_milliseconds >= period {
            self.accumulated_milliseconds -= period;
            self.frames_pushed += 1;
        }
        self.frames_pushed
    }

    /// Frames produced by the last [`Self::consume`].
    pub fn frames_pushed(&self) -> u32 {
        self.frames_pushed
    }

    pub fn accumulated_milliseconds(&self) -> f64 {
        self.accumulated_milliseconds
    }

    /// Whether an entity on `layers` is driven by this loop.
    pub fn drives(&self, layers: Layers) -> bool {
        self.layers_override
            .is_none_or(|mask| mask.intersects(layers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate() {
        let l = AnimationLoop::default();
        assert_eq!(l.frame_rate, 30);
        assert_eq!(l.frames_pushed(), 0);
    }

    #[test]
    fn test_consume_counts_whole_frames() {
        let mut l = AnimationLoop::new(20);
        assert_eq!(l.consume(100.0), 2);
        assert_eq!(l.consume(30.0), 0);
        assert_eq!(l.accumulated_milliseconds(), 30.0);
        assert_eq!(l.consume(30.0), 1);
        assert_eq!(l.accumulated_milliseconds(), 10.0);
    }

    #[test]
    fn test_zero_frame_rate_disables_pushes() {
        let mut l = AnimationLoop::new(0);
        assert_eq!(l.milliseconds_per_frame(), 0.0);
        assert_eq!(l.consume(10_000.0), 0);
        assert_eq!(l.accumulated_milliseconds(), 0.0);
    }

    #[test]
    fn test_layers_override() {
        let mut l = AnimationLoop::default();
        assert!(l.drives(Layers::LAYER_3));
        l.layers_override = Some(Layers::LAYER_1 | Layers::LAYER_2);
        assert!(l.drives(Layers::LAYER_2));
        assert!(!l.drives(Layers::DEFAULT));
    }
}
