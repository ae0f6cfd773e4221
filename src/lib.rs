//! Aberred sprite library.
//!
//! This module exposes the sprite animation and render dispatch components,
//! resources, systems, and events for use in integration tests and as a
//! reusable library.

pub mod components;
pub mod events;
pub mod game;
pub mod memo;
pub mod resources;
pub mod systems;
