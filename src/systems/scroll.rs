//! Advances scrolling sprite offsets.

use bevy_ecs::prelude::*;

use crate::components::scrollingsprite::ScrollingSpriteRenderer;
use crate::resources::worldtime::FrameTime;

pub fn scroll_sprites(time: Res<FrameTime>, mut query: Query<&mut ScrollingSpriteRenderer>) {
    if time.seconds_passed <= 0.0 {
        return;
    }
    for mut renderer in query.iter_mut() {
        if renderer.scroll_speed.x == 0.0 && renderer.scroll_speed.y == 0.0 {
            continue;
        }
        renderer.scroll(time.seconds_passed);
    }
}
