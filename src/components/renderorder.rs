//! Fine-grained draw order within a render priority band.
//!
//! Entities are sorted by [`RenderPriority`](crate::components::renderpriority::RenderPriority)
//! first and [`RenderOrder`] second. Higher values are drawn later (on top).

use bevy_ecs::prelude::Component;

/// Tie-break draw order inside a priority band.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderOrder(pub i32);
