//! Layer bitmask used for camera visibility filtering.

use bevy_ecs::prelude::Component;
use bitflags::bitflags;

bitflags! {
    /// Set of layers an entity belongs to, or a camera renders or excludes.
    #[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u16 {
        const DEFAULT = 1 << 0;
        const LAYER_1 = 1 << 1;
        const LAYER_2 = 1 << 2;
        const LAYER_3 = 1 << 3;
        const LAYER_4 = 1 << 4;
        const LAYER_5 = 1 << 5;
        const LAYER_6 = 1 << 6;
        const LAYER_7 = 1 << 7;
        const LAYER_8 = 1 << 8;
        const LAYER_9 = 1 << 9;
        const LAYER_10 = 1 << 10;
        const LAYER_11 = 1 << 11;
        const LAYER_12 = 1 << 12;
        const LAYER_13 = 1 << 13;
        const LAYER_14 = 1 << 14;
        const LAYER_15 = 1 << 15;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Layers::DEFAULT
    }
}
