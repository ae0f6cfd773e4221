//! Per-tick frame time.
//!
//! [`FrameTime`] is the only time source of the animation and render systems.
//! It is written once per tick by [`crate::systems::time::update_frame_time`].

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct FrameTime {
    /// Scaled milliseconds elapsed during the current tick.
    pub milliseconds_passed: f64,
    /// Same as `milliseconds_passed`, in seconds.
    pub seconds_passed: f32,
    /// Scaled seconds since startup.
    pub total_seconds: f64,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for FrameTime {
    fn default() -> Self {
        FrameTime {
            milliseconds_passed: 0.0,
            seconds_passed: 0.0,
            total_seconds: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl FrameTime {
    /// A single tick lasting `milliseconds`.
    pub fn from_milliseconds(milliseconds: f64) -> Self {
        FrameTime {
            milliseconds_passed: milliseconds,
            seconds_passed: (milliseconds / 1000.0) as f32,
            ..Default::default()
        }
    }
}
