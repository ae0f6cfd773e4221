//! ECS components for entities.
//!
//! Components define the data attached to animated and rendered entities.
//!
//! Submodules overview:
//! - [`animation`] – animation definitions and the step/frame playback state
//! - [`animationqueue`] – FIFO of pending animations with finished notifications
//! - [`animator`] – the [`animator::Animatable`] seam and the basic animators
//! - [`boundingarea`] – axis-aligned world areas and the cached entity bounds
//! - [`camera`] – 2D camera with layer masks and a cached view
//! - [`layers`] – bit mask used for camera and animation filtering
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`randomanimator`] – animators that pick frames or idle times at random
//! - [`renderorder`] – ordering hint inside a render priority band
//! - [`renderpriority`] – coarse render band
//! - [`rotation`] – rotation angle in degrees
//! - [`scale`] – 2D scale factor for sprites
//! - [`scrollingsprite`] – sprite renderer with a wrapping texture scroll
//! - [`sprite`] – sprite renderer and shared drawing helpers
//! - [`tint`] – per-entity draw color
//! - [`visibility`] – render toggles

pub mod animation;
pub mod animationqueue;
pub mod animator;
pub mod boundingarea;
pub mod camera;
pub mod layers;
pub mod mapposition;
pub mod randomanimator;
pub mod renderorder;
pub mod renderpriority;
pub mod rotation;
pub mod scale;
pub mod scrollingsprite;
pub mod sprite;
pub mod tint;
pub mod visibility;
