//! Coarse z-layering band used as the primary render sort key.

use bevy_ecs::prelude::Component;

/// Render band. Variants are declared in draw order, so the derived `Ord`
/// puts backgrounds first.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderPriority {
    Background,
    #[default]
    Default,
    Foreground,
    Overlay,
}

impl RenderPriority {
    pub const ALL: [RenderPriority; 4] = [
        RenderPriority::Background,
        RenderPriority::Default,
        RenderPriority::Foreground,
        RenderPriority::Overlay,
    ];

    /// Lowercase name used as the `[debug] priority_<name>` config key suffix.
    pub fn name(self) -> &'static str {
        match self {
            RenderPriority::Background => "background",
            RenderPriority::Default => "default",
            RenderPriority::Foreground => "foreground",
            RenderPriority::Overlay => "overlay",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}
