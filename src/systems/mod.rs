//! Engine systems.
//!
//! This module groups the ECS systems that advance animation and prepare
//! rendering.
//!
//! Submodules overview
//! - [`animation`] – advance animators and report finished animations
//! - [`bounds`] – drop cached entity bounds and camera views when inputs change
//! - [`render`] – cull, filter and order entities per camera into the render queue
//! - [`scroll`] – advance scrolling sprite offsets
//! - [`spatial`] – rebuild the spatial index from renderable entities
//! - [`time`] – update the per-tick frame time
pub mod animation;
pub mod bounds;
pub mod render;
pub mod scroll;
pub mod spatial;
pub mod time;
