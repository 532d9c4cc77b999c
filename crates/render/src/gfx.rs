use cubeview_assets::{AssetError, ShaderSource};
use cubeview_common::{ModelId, ShaderId, TextureHandle, UniformValue};
use glam::{Mat4, Vec3};
use std::path::Path;

/// Errors from creating GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("shader {label} failed to compile: {message}")]
    ShaderCompile { label: String, message: String },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Immediate-mode drawing interface the frame driver talks to.
///
/// State is sticky in the usual way: uniforms go to the currently bound
/// program and textures stay on their unit until rebound.
pub trait Graphics {
    /// Start a frame by clearing colour and depth.
    fn clear(&mut self, colour: [f32; 4]);

    fn use_program(&mut self, shader: ShaderId);

    /// Set a named uniform on the bound program. Unknown names are ignored.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    /// Draw the unit cube with the bound program and textures.
    fn draw_cube(&mut self);

    /// Draw every mesh of a model with the bound program. The model binds
    /// its own textures.
    fn draw_model(&mut self, model: ModelId);

    /// Present the frame.
    fn swap_buffers(&mut self);

    /// Bind `shader` and get a handle for setting its uniforms.
    fn program(&mut self, shader: ShaderId) -> Program<'_, Self>
    where
        Self: Sized,
    {
        self.use_program(shader);
        Program { gfx: self }
    }
}

/// Creation of long-lived GPU resources. Called once at startup.
pub trait ResourceLoader {
    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, RenderError>;

    /// Decode and upload a texture. Failures are logged and yield
    /// [`TextureHandle::INVALID`].
    fn load_texture(&mut self, path: &Path) -> TextureHandle;

    /// Load a model. Failures are logged and yield an empty model.
    fn load_model(&mut self, path: &Path) -> ModelId;
}

/// A bound shader program.
pub struct Program<'g, G: Graphics> {
    gfx: &'g mut G,
}

impl<G: Graphics> Program<'_, G> {
    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> &mut Self {
        self.gfx.set_uniform(name, UniformValue::Vec3(value));
        self
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> &mut Self {
        self.gfx.set_uniform(name, UniformValue::Mat4(value));
        self
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> &mut Self {
        self.gfx.set_uniform(name, UniformValue::Int(value));
        self
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> &mut Self {
        self.gfx.set_uniform(name, UniformValue::Float(value));
        self
    }

    pub fn bind_texture(&mut self, unit: u32, texture: TextureHandle) -> &mut Self {
        self.gfx.bind_texture(unit, texture);
        self
    }

    pub fn draw_cube(&mut self) {
        self.gfx.draw_cube();
    }

    pub fn draw_model(&mut self, model: ModelId) {
        self.gfx.draw_model(model);
    }
}
