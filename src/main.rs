//! Aberred sprite demo entry point.
//!
//! A small 2D scene built with:
//! - **raylib** for windowing and drawing
//! - **bevy_ecs** for entity-component-system architecture
//!
//! The scene has one entity per animator kind, a scrolling background and two
//! cameras: the main one, and an overlay camera that only renders
//! `Layers::LAYER_1`. The sprite sheet texture is generated at startup, so no
//! asset files are needed.
//!
//! # Main Loop
//!
//! 1. Update the frame time from raylib's frame delta
//! 2. Run the update schedule (animation, scrolling)
//! 3. Run the render schedule (cache invalidation, spatial index, per-camera dispatch)
//! 4. Replay the recorded render queue into a raylib sprite batch
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config config.ini --frame-rate 24 --seed 42
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use aberredsprite::events::animation::AnimationFinishedEvent;
use aberredsprite::game::{
    DEMO_COLUMNS, DEMO_ROWS, DEMO_SHEET, DEMO_SPRITE_SIZE, build_render_schedule,
    build_update_schedule, insert_resources, make_rng, spawn_demo_scene,
};
use aberredsprite::resources::gameconfig::GameConfig;
use aberredsprite::resources::screensize::ScreenSize;
use aberredsprite::resources::shaderstore::ShaderStore;
use aberredsprite::resources::spritebatch::{RaylibSpriteBatch, RenderQueue};
use aberredsprite::resources::texturestore::TextureStore;
use aberredsprite::systems::time::update_frame_time;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, error, info, warn};
use raylib::prelude::*;

/// Aberred sprite demo
#[derive(Parser)]
#[command(version, about = "Sprite animation and render dispatch demo.")]
struct Cli {
    /// INI configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Shared animation frame rate, overriding the config file.
    #[arg(long, value_name = "FPS")]
    frame_rate: Option<u32>,

    /// Seed for the random animators, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
}

const DEMO_PALETTE: [Color; 8] = [
    Color::RED,
    Color::ORANGE,
    Color::YELLOW,
    Color::GREEN,
    Color::SKYBLUE,
    Color::BLUE,
    Color::VIOLET,
    Color::DARKGRAY,
];

/// Draws the demo sprite sheet: one colored cell per sprite with a marker
/// that walks around the cell so the spin cycle is visible.
fn generate_demo_image() -> Image {
    let size = DEMO_SPRITE_SIZE as i32;
    let mut image = Image::gen_image_color(
        size * DEMO_COLUMNS as i32,
        size * DEMO_ROWS as i32,
        Color::BLANK,
    );
    let quarter = size / 4;
    let markers = [(0, 0), (2, 0), (2, 2), (0, 2)];
    for (index, color) in DEMO_PALETTE.iter().enumerate() {
        let x = (index as i32 % DEMO_COLUMNS as i32) * size;
        let y = (index as i32 / DEMO_COLUMNS as i32) * size;
        image.draw_rectangle(x + 1, y + 1, size - 2, size - 2, *color);
        let (mx, my) = markers[index % markers.len()];
        image.draw_rectangle(
            x + quarter * (mx + 1) - quarter / 2,
            y + quarter * (my + 1) - quarter / 2,
            quarter,
            quarter,
            Color::WHITE,
        );
    }
    image
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(frame_rate) = cli.frame_rate {
        config.frame_rate = frame_rate;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    info!("Hello, world! This is the Aberred sprite demo!");
    // --------------- Raylib window & assets ---------------
    let (window_width, window_height) = config.window_size();
    let mut builder = raylib::init();
    builder
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title("Aberred Sprite");
    if config.vsync {
        builder.vsync();
    }
    if config.fullscreen {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);

    let mut textures = TextureStore::new();
    match rl.load_texture_from_image(&thread, &generate_demo_image()) {
        Ok(texture) => textures.insert(DEMO_SHEET, texture),
        Err(e) => error!("Failed to create demo texture: {}", e),
    }
    let shaders = ShaderStore::new();

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    insert_resources(&mut world, &config);
    world.insert_resource(ScreenSize::new(
        rl.get_screen_width(),
        rl.get_screen_height(),
    ));
    world.add_observer(|trigger: On<AnimationFinishedEvent>| {
        debug!("{:?} finished '{}'", trigger.entity, trigger.animation);
    });

    let mut rng = make_rng(config.seed);
    if let Err(e) = spawn_demo_scene(&mut world, &mut rng) {
        error!("Failed to spawn demo scene: {}", e);
        return;
    }
    world.flush();

    let mut update = build_update_schedule();
    let mut render = build_render_schedule();

    // --------------- Main loop ---------------
    while !rl.window_should_close() {
        update_frame_time(&mut world, rl.get_frame_time());

        // Viewport follows the window; only write on change so camera views stay cached.
        let screen = ScreenSize::new(rl.get_screen_width(), rl.get_screen_height());
        if *world.resource::<ScreenSize>() != screen {
            world.insert_resource(screen);
        }

        update.run(&mut world);
        render.run(&mut world);

        {
            let queue = world.resource::<RenderQueue>();
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            {
                let mut batch = RaylibSpriteBatch::new(&mut d, &textures, &shaders);
                queue.replay(&mut batch);
            }
            d.draw_fps(10, 10);
        }

        world.clear_trackers(); // Clear changed components for next frame
    }
    info!("Demo closed");
}
