use crate::gfx::{Graphics, RenderError, ResourceLoader};
use cubeview_assets::ShaderSource;
use cubeview_common::{ModelId, ShaderId, TextureHandle, UniformValue};
use std::path::{Path, PathBuf};

/// One call made against [`RecordingGraphics`].
#[derive(Debug, Clone, PartialEq)]
pub enum GfxCommand {
    Clear([f32; 4]),
    UseProgram(ShaderId),
    SetUniform {
        shader: Option<ShaderId>,
        name: String,
        value: UniformValue,
    },
    BindTexture {
        unit: u32,
        texture: TextureHandle,
    },
    DrawCube {
        shader: Option<ShaderId>,
        textures: [TextureHandle; 2],
    },
    DrawModel {
        shader: Option<ShaderId>,
        model: ModelId,
    },
    SwapBuffers,
}

/// Record of a model loaded through [`RecordingGraphics`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedModel {
    pub path: PathBuf,
    pub meshes: usize,
}

/// Headless backend that records every call instead of drawing.
///
/// Textures and models are really decoded so load failures behave as they
/// do on the GPU backend. Used by tests and the CLI.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    commands: Vec<GfxCommand>,
    bound: Option<ShaderId>,
    units: [TextureHandle; 2],
    shaders: Vec<String>,
    textures: Vec<PathBuf>,
    models: Vec<RecordedModel>,
    frames: u64,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[GfxCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<GfxCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of completed frames (buffer swaps).
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn shader_label(&self, id: ShaderId) -> Option<&str> {
        self.shaders.get(id.0 as usize).map(String::as_str)
    }

    pub fn model(&self, id: ModelId) -> Option<&RecordedModel> {
        self.models.get(id.0 as usize)
    }

    /// Human-readable description of the recorded commands.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Recorded frames: {} ===\n", self.frames));
        out.push_str(&format!(
            "Shaders: {}  Textures: {}  Models: {}\n",
            self.shaders.len(),
            self.textures.len(),
            self.models.len()
        ));
        out.push_str(&format!(
            "Commands: {} (cube draws={}, model draws={}, uniform sets={})\n",
            self.commands.len(),
            self.count(|c| matches!(c, GfxCommand::DrawCube { .. })),
            self.count(|c| matches!(c, GfxCommand::DrawModel { .. })),
            self.count(|c| matches!(c, GfxCommand::SetUniform { .. })),
        ));
        for model in &self.models {
            out.push_str(&format!(
                "  model {} meshes={}\n",
                model.path.display(),
                model.meshes
            ));
        }
        out
    }

    fn count(&self, pred: impl Fn(&GfxCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Graphics for RecordingGraphics {
    fn clear(&mut self, colour: [f32; 4]) {
        self.commands.push(GfxCommand::Clear(colour));
    }

    fn use_program(&mut self, shader: ShaderId) {
        self.bound = Some(shader);
        self.commands.push(GfxCommand::UseProgram(shader));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.commands.push(GfxCommand::SetUniform {
            shader: self.bound,
            name: name.to_string(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if let Some(slot) = self.units.get_mut(unit as usize) {
            *slot = texture;
        }
        self.commands.push(GfxCommand::BindTexture { unit, texture });
    }

    fn draw_cube(&mut self) {
        self.commands.push(GfxCommand::DrawCube {
            shader: self.bound,
            textures: self.units,
        });
    }

    fn draw_model(&mut self, model: ModelId) {
        self.commands.push(GfxCommand::DrawModel {
            shader: self.bound,
            model,
        });
    }

    fn swap_buffers(&mut self) {
        self.frames += 1;
        self.commands.push(GfxCommand::SwapBuffers);
    }
}

impl ResourceLoader for RecordingGraphics {
    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, RenderError> {
        if source.vertex.trim().is_empty() || source.fragment.trim().is_empty() {
            return Err(RenderError::ShaderCompile {
                label: source.label.clone(),
                message: "empty shader stage".into(),
            });
        }
        self.shaders.push(source.label.clone());
        Ok(ShaderId(self.shaders.len() as u32 - 1))
    }

    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        match cubeview_assets::load_image(path) {
            Ok(_) => {
                self.textures.push(path.to_path_buf());
                TextureHandle(self.textures.len() as u32)
            }
            Err(e) => {
                tracing::error!("texture failed to load at path {}: {e}", path.display());
                TextureHandle::INVALID
            }
        }
    }

    fn load_model(&mut self, path: &Path) -> ModelId {
        let meshes = match cubeview_assets::load_obj(path) {
            Ok(data) => data.meshes.len(),
            Err(e) => {
                tracing::error!("model failed to load: {e}");
                0
            }
        };
        self.models.push(RecordedModel {
            path: path.to_path_buf(),
            meshes,
        });
        ModelId(self.models.len() as u32 - 1)
    }
}
