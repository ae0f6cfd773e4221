//! Shaders cameras may name as their batch shader.
//!
//! Not a `Resource`: shaders are tied to the OpenGL context and only live in
//! the thread that owns the window.

use raylib::prelude::Shader;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct ShaderStore {
    shaders: FxHashMap<String, Shader>,
}

impl ShaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any shader already stored under `id`.
    pub fn add(&mut self, id: &str, shader: Shader) {
        self.shaders.insert(id.to_string(), shader);
    }

    pub fn get(&self, id: &str) -> Option<&Shader> {
        self.shaders.get(id)
    }
}
