//! Time update system.
//!
//! Updates the shared [`FrameTime`](crate::resources::worldtime::FrameTime)
//! resource once per frame, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::FrameTime;

/// Write this tick's scaled duration into `FrameTime`.
///
/// `dt` is the unscaled frame delta in seconds. Negative deltas count as zero.
pub fn update_frame_time(world: &mut World, dt: f32) {
    let mut ft = world.resource_mut::<FrameTime>();
    let scaled_dt = dt.max(0.0) * ft.time_scale.max(0.0);
    ft.seconds_passed = scaled_dt;
    ft.milliseconds_passed = scaled_dt as f64 * 1000.0;
    ft.total_seconds += scaled_dt as f64;
    ft.frame_count += 1;
}
