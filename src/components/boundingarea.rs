//! World-space axis-aligned bounds.
//!
//! [`BoundingArea`] is the rectangle used for culling and spatial queries.
//! [`Bounds`] caches the bounding area of a renderable entity until one of its
//! inputs changes (see [`crate::systems::bounds`]).

use bevy_ecs::prelude::Component;
use raylib::prelude::{Rectangle, Vector2};

use crate::memo::Memo;

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingArea {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingArea {
    /// Area with no extent. Never overlaps anything.
    pub const EMPTY: BoundingArea = BoundingArea {
        min: Vector2 { x: 0.0, y: 0.0 },
        max: Vector2 { x: 0.0, y: 0.0 },
    };

    /// Area covering every representable coordinate.
    pub const UNBOUNDED: BoundingArea = BoundingArea {
        min: Vector2 {
            x: f32::MIN,
            y: f32::MIN,
        },
        max: Vector2 {
            x: f32::MAX,
            y: f32::MAX,
        },
    };

    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vector2 { x, y },
            max: Vector2 { x: x + w, y: y + h },
        }
    }

    /// Smallest area containing every point.
    pub fn from_points(points: &[Vector2]) -> Self {
        let Some(first) = points.first() else {
            return Self::EMPTY;
        };
        points.iter().skip(1).fold(
            Self {
                min: *first,
                max: *first,
            },
            |acc, p| Self {
                min: Vector2 {
                    x: acc.min.x.min(p.x),
                    y: acc.min.y.min(p.y),
                },
                max: Vector2 {
                    x: acc.max.x.max(p.x),
                    y: acc.max.y.max(p.y),
                },
            },
        )
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vector2 {
        Vector2 {
            x: self.min.x + self.width() * 0.5,
            y: self.min.y + self.height() * 0.5,
        }
    }

    /// True when either side has zero or negative length.
    pub fn is_empty(&self) -> bool {
        !(self.max.x > self.min.x && self.max.y > self.min.y)
    }

    /// Inclusive overlap test. Empty areas never overlap.
    pub fn overlaps(&self, other: &BoundingArea) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// True when `other` lies fully inside this area.
    pub fn contains(&self, other: &BoundingArea) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle {
            x: self.min.x,
            y: self.min.y,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl Default for BoundingArea {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Cached world bounds of a renderable entity.
#[derive(Component, Debug, Default, Clone)]
pub struct Bounds {
    area: Memo<BoundingArea>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached area, computing it with `compute` on a miss.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> BoundingArea) -> BoundingArea {
        *self.area.get_or_compute(compute)
    }

    pub fn cached(&self) -> Option<BoundingArea> {
        self.area.get().copied()
    }

    pub fn invalidate(&mut self) {
        self.area.invalidate();
    }
}
