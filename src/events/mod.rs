//! Event types used by the engine.
//!
//! Events let systems notify gameplay code without direct dependencies.
//! Register observers with `world.add_observer`.
//!
//! Submodules:
//! - [`animation`] – animation finished notifications
pub mod animation;
