//! Viewer configuration.
//!
//! Every field has a default matching the stock scene, so an empty or
//! partial YAML file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Paths to a vertex-stage and a fragment-stage shader source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Diffuse map bound to texture unit 0 on every cube.
    pub diffuse_texture: PathBuf,
    /// Specular map bound to texture unit 1 on every cube.
    pub specular_texture: PathBuf,
    /// Animated model (slides along its local Z axis).
    pub animated_model: PathBuf,
    /// Static model.
    pub static_model: PathBuf,
    /// Overrides for the built-in cube shader.
    pub cube_shader: Option<ShaderPaths>,
    /// Overrides for the built-in model shader.
    pub model_shader: Option<ShaderPaths>,
    /// Seed for cube placement. Random when unset.
    pub seed: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Video Games?".into(),
            width: 800,
            height: 600,
            diffuse_texture: "container2.png".into(),
            specular_texture: "container2_specular.png".into(),
            animated_model: "assets/12140_Skull_v3_L2.obj".into(),
            static_model: "assets/nanosuit.obj".into(),
            cube_shader: None,
            model_shader: None,
            seed: None,
        }
    }
}

impl ViewerConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Width over height, guarding against a zero-height window.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
