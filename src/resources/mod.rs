//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: timing, the animation clock,
//! configuration, asset stores and the render plumbing. Each submodule
//! documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `animationloop` – shared animation frame rate and its time accumulator
//! - `gameconfig` – INI-backed configuration
//! - `rendersettings` – pixels per unit, pixel snapping and debug colors
//! - `scenebounds` – optional world area limiting the spatial index
//! - `screensize` – viewport dimensions in pixels
//! - `shaderstore` – loaded shaders keyed by name
//! - `spatialindex` – quad tree of renderable entities, rebuilt every frame
//! - `spritebatch` – sprite batch seam, deferred render queue and raylib batch
//! - `spritesheetstore` – sprite sheets and their named animations
//! - `texturestore` – loaded textures keyed by string IDs
//! - `worldtime` – per-tick scaled frame time
pub mod animationloop;
pub mod gameconfig;
pub mod rendersettings;
pub mod scenebounds;
pub mod screensize;
pub mod shaderstore;
pub mod spatialindex;
pub mod spritebatch;
pub mod spritesheetstore;
pub mod texturestore;
pub mod worldtime;
