//! Game configuration resource.
//!
//! Settings loaded from an INI file. Defaults allow a safe startup when the
//! file is missing or incomplete.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 640
//! height = 360
//!
//! [window]
//! width = 1280
//! height = 720
//! fullscreen = false
//! vsync = true
//! target_fps = 120
//!
//! [animation]
//! frame_rate = 30
//! seed = 1234
//!
//! [camera]
//! pixels_per_unit = 16
//! snap_to_pixels = true
//!
//! [debug]
//! priority_background = #20406080
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use raylib::prelude::Color;
use thiserror::Error;

use crate::components::renderpriority::RenderPriority;
use crate::components::tint::parse_hex_color;

const DEFAULT_RENDER_WIDTH: u32 = 640;
const DEFAULT_RENDER_HEIGHT: u32 = 360;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_FRAME_RATE: u32 = 30;
const DEFAULT_PIXELS_PER_UNIT: f32 = 16.0;
const DEFAULT_SNAP_TO_PIXELS: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

const PRIORITY_KEY_PREFIX: &str = "priority_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {message}")]
    Load { path: PathBuf, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to save config file {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Viewport width in pixels.
    pub render_width: u32,
    /// Viewport height in pixels.
    pub render_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub vsync: bool,
    pub fullscreen: bool,
    /// Shared animation frame rate. Zero pauses shared-rate animators.
    pub frame_rate: u32,
    /// Seed for the random animators. Unseeded when `None`.
    pub seed: Option<u64>,
    pub pixels_per_unit: f32,
    pub snap_to_pixels: bool,
    /// Flat debug colors per render priority.
    pub priority_colors: BTreeMap<RenderPriority, Color>,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            frame_rate: DEFAULT_FRAME_RATE,
            seed: None,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            snap_to_pixels: DEFAULT_SNAP_TO_PIXELS,
            priority_colors: BTreeMap::new(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|message| ConfigError::Load {
                path: self.config_path.clone(),
                message,
            })?;
        self.apply_ini(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(ConfigError::Parse)?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [render]
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }

        // [window]
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [animation]
        if let Some(rate) = config.getuint("animation", "frame_rate").ok().flatten() {
            self.frame_rate = rate as u32;
        }
        if let Some(seed) = config.getuint("animation", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        // [camera]
        if let Some(ppu) = config.getfloat("camera", "pixels_per_unit").ok().flatten() {
            if ppu > 0.0 {
                self.pixels_per_unit = ppu as f32;
            } else {
                warn!("Ignoring non-positive pixels_per_unit {}", ppu);
            }
        }
        if let Some(snap) = config.getbool("camera", "snap_to_pixels").ok().flatten() {
            self.snap_to_pixels = snap;
        }

        // [debug]
        if let Some(section) = config.get_map_ref().get("debug") {
            for (key, value) in section {
                let Some(name) = key.strip_prefix(PRIORITY_KEY_PREFIX) else {
                    continue;
                };
                let Some(priority) = RenderPriority::from_name(name) else {
                    warn!("Unknown render priority in config key '{}'", key);
                    continue;
                };
                match value.as_deref().and_then(parse_hex_color) {
                    Some(color) => {
                        self.priority_colors.insert(priority, color);
                    }
                    None => warn!("Invalid color for '{}': {:?}", key, value),
                }
            }
        }

        info!(
            "Loaded config: {}x{} render, {}x{} window, fps={}, vsync={}, fullscreen={}, \
             frame_rate={}, ppu={}",
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.fullscreen,
            self.frame_rate,
            self.pixels_per_unit
        );
    }

    fn to_ini(&self) -> Ini {
        let mut config = Ini::new();

        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config.set("animation", "frame_rate", Some(self.frame_rate.to_string()));
        if let Some(seed) = self.seed {
            config.set("animation", "seed", Some(seed.to_string()));
        }

        config.set(
            "camera",
            "pixels_per_unit",
            Some(self.pixels_per_unit.to_string()),
        );
        config.set(
            "camera",
            "snap_to_pixels",
            Some(self.snap_to_pixels.to_string()),
        );

        for (priority, color) in &self.priority_colors {
            config.set(
                "debug",
                &format!("{}{}", PRIORITY_KEY_PREFIX, priority.name()),
                Some(format!(
                    "#{:02x}{:02x}{:02x}{:02x}",
                    color.r, color.g, color.b, color.a
                )),
            );
        }
        config
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        self.to_ini()
            .write(&self.config_path)
            .map_err(|source| ConfigError::Save {
                path: self.config_path.clone(),
                source,
            })?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn render_size(&self) -> (u32, u32) {
        (self.render_width, self.render_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GameConfig::new();
        assert_eq!(c.render_size(), (640, 360));
        assert_eq!(c.frame_rate, 30);
        assert!(c.seed.is_none());
        assert!(c.priority_colors.is_empty());
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut c = GameConfig::new();
        c.load_from_str(
            "[render]\nwidth = 320\n\
             [animation]\nframe_rate = 12\nseed = 99\n\
             [camera]\npixels_per_unit = 8\nsnap_to_pixels = false\n",
        )
        .unwrap();
        assert_eq!(c.render_width, 320);
        assert_eq!(c.render_height, 360);
        assert_eq!(c.frame_rate, 12);
        assert_eq!(c.seed, Some(99));
        assert_eq!(c.pixels_per_unit, 8.0);
        assert!(!c.snap_to_pixels);
    }

    #[test]
    fn test_debug_priority_colors() {
        let mut c = GameConfig::new();
        c.load_from_str(
            "[debug]\npriority_background = #ff000080\n\
             priority_nonsense = #ffffff\npriority_overlay = zzz\n",
        )
        .unwrap();
        assert_eq!(c.priority_colors.len(), 1);
        let color = c.priority_colors[&RenderPriority::Background];
        assert_eq!((color.r, color.g, color.b, color.a), (255, 0, 0, 128));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut c = GameConfig::with_path("/no/such/dir/config.ini");
        assert!(matches!(
            c.load_from_file(),
            Err(ConfigError::Load { .. })
        ));
        assert_eq!(c.render_width, 640);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "aberredsprite-config-{}.ini",
            std::process::id()
        ));
        let mut c = GameConfig::with_path(&path);
        c.frame_rate = 24;
        c.seed = Some(7);
        c.priority_colors
            .insert(RenderPriority::Overlay, Color::new(1, 2, 3, 4));
        c.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.frame_rate, 24);
        assert_eq!(loaded.seed, Some(7));
        let color = loaded.priority_colors[&RenderPriority::Overlay];
        assert_eq!((color.r, color.g, color.b, color.a), (1, 2, 3, 4));
    }
}
