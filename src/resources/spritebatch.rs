//! Sprite batch seam between render dispatch and the GPU.
//!
//! [`crate::systems::render::render_dispatch`] writes into a [`RenderQueue`]
//! resource through the [`SpriteBatch`] trait. The game loop then replays the
//! queue into a [`RaylibSpriteBatch`] while it holds the draw handle. Keeping
//! the queue in the ECS makes dispatch testable without a window.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::trace;
use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

use crate::resources::shaderstore::ShaderStore;
use crate::resources::texturestore::TextureStore;

/// Texture sampling used for a whole batch.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum SamplerState {
    /// Nearest neighbour. Sharp pixels for pixel art.
    #[default]
    PointClamp,
    /// Bilinear interpolation.
    LinearClamp,
}

impl SamplerState {
    fn texture_filter(self) -> i32 {
        match self {
            SamplerState::PointClamp => TextureFilter::TEXTURE_FILTER_POINT as i32,
            SamplerState::LinearClamp => TextureFilter::TEXTURE_FILTER_BILINEAR as i32,
        }
    }
}

/// State a batch is opened with. Draws are already sorted, so the batch
/// submits them in call order.
#[derive(Clone, Debug)]
pub struct BatchSettings {
    pub camera: Camera2D,
    pub sampler: SamplerState,
    /// Key into the [`ShaderStore`].
    pub shader: Option<Arc<str>>,
}

/// One textured quad.
#[derive(Clone, Debug)]
pub struct SpriteDraw {
    /// Key into the [`TextureStore`].
    pub texture: Arc<str>,
    /// Texture region in pixels. Negative sizes flip.
    pub source: Rectangle,
    /// World-space destination before rotation.
    pub dest: Rectangle,
    /// Rotation pivot relative to `dest`, in world units.
    pub origin: Vector2,
    pub rotation: f32,
    pub color: Color,
}

pub trait SpriteBatch {
    fn begin(&mut self, settings: &BatchSettings);
    fn draw(&mut self, draw: SpriteDraw);
    fn end(&mut self);
}

#[derive(Clone, Debug)]
pub enum RenderCommand {
    Begin(BatchSettings),
    Draw(SpriteDraw),
    End,
}

/// Deferred batch recorded during dispatch.
#[derive(Resource, Default, Debug, Clone)]
pub struct RenderQueue {
    commands: Vec<RenderCommand>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Every recorded draw in submission order.
    pub fn draws(&self) -> impl Iterator<Item = &SpriteDraw> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Draw(draw) => Some(draw),
            _ => None,
        })
    }

    pub fn batch_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Begin(_)))
            .count()
    }

    /// Feeds the recorded commands into another batch.
    pub fn replay(&self, batch: &mut impl SpriteBatch) {
        for command in &self.commands {
            match command {
                RenderCommand::Begin(settings) => batch.begin(settings),
                RenderCommand::Draw(draw) => batch.draw(draw.clone()),
                RenderCommand::End => batch.end(),
            }
        }
    }
}

impl SpriteBatch for RenderQueue {
    fn begin(&mut self, settings: &BatchSettings) {
        self.commands.push(RenderCommand::Begin(settings.clone()));
    }

    fn draw(&mut self, draw: SpriteDraw) {
        self.commands.push(RenderCommand::Draw(draw));
    }

    fn end(&mut self) {
        self.commands.push(RenderCommand::End);
    }
}

/// Batch that draws through raylib. Draws are buffered until [`SpriteBatch::end`]
/// and flushed inside one 2D camera mode.
pub struct RaylibSpriteBatch<'a, 'b> {
    d: &'a mut RaylibDrawHandle<'b>,
    textures: &'a TextureStore,
    shaders: &'a ShaderStore,
    settings: Option<BatchSettings>,
    pending: Vec<SpriteDraw>,
}

impl<'a, 'b> RaylibSpriteBatch<'a, 'b> {
    pub fn new(
        d: &'a mut RaylibDrawHandle<'b>,
        textures: &'a TextureStore,
        shaders: &'a ShaderStore,
    ) -> Self {
        Self {
            d,
            textures,
            shaders,
            settings: None,
            pending: Vec::new(),
        }
    }
}

impl SpriteBatch for RaylibSpriteBatch<'_, '_> {
    fn begin(&mut self, settings: &BatchSettings) {
        self.settings = Some(settings.clone());
        self.pending.clear();
    }

    fn draw(&mut self, draw: SpriteDraw) {
        self.pending.push(draw);
    }

    fn end(&mut self) {
        let Some(settings) = self.settings.take() else {
            return;
        };
        let shader = settings
            .shader
            .as_deref()
            .and_then(|key| self.shaders.get(key));
        let filter = settings.sampler.texture_filter();

        let mut d2 = self.d.begin_mode2D(settings.camera);
        if let Some(shader) = shader {
            unsafe {
                ffi::BeginShaderMode(**shader);
            }
        }
        for draw in self.pending.drain(..) {
            let Some(texture) = self.textures.get(&draw.texture) else {
                trace!("Skipping draw with missing texture '{}'", draw.texture);
                continue;
            };
            unsafe {
                ffi::SetTextureFilter(**texture, filter);
            }
            d2.draw_texture_pro(
                texture,
                draw.source,
                draw.dest,
                draw.origin,
                draw.rotation,
                draw.color,
            );
        }
        if shader.is_some() {
            unsafe {
                ffi::EndShaderMode();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BatchSettings {
        BatchSettings {
            camera: Camera2D {
                offset: Vector2::zero(),
                target: Vector2::zero(),
                rotation: 0.0,
                zoom: 1.0,
            },
            sampler: SamplerState::default(),
            shader: None,
        }
    }

    fn quad(texture: &str) -> SpriteDraw {
        SpriteDraw {
            texture: Arc::from(texture),
            source: Rectangle::new(0.0, 0.0, 8.0, 8.0),
            dest: Rectangle::new(0.0, 0.0, 1.0, 1.0),
            origin: Vector2::zero(),
            rotation: 0.0,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_queue_records_in_order() {
        let mut q = RenderQueue::new();
        q.begin(&settings());
        q.draw(quad("a"));
        q.draw(quad("b"));
        q.end();
        assert_eq!(q.batch_count(), 1);
        let names: Vec<&str> = q.draws().map(|d| &*d.texture).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(q.commands().last(), Some(RenderCommand::End)));
    }

    #[test]
    fn test_replay_into_other_batch() {
        let mut q = RenderQueue::new();
        q.begin(&settings());
        q.draw(quad("a"));
        q.end();
        let mut copy = RenderQueue::new();
        q.replay(&mut copy);
        assert_eq!(copy.commands().len(), 3);
        q.clear();
        assert!(q.commands().is_empty());
    }
}
