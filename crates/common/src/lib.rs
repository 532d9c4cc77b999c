//! Types shared by every cubeview crate.
//!
//! # Invariants
//! - Handles are plain indices into tables owned by the graphics backend.
//! - `TextureHandle::INVALID` is never produced for a successfully uploaded texture.

pub mod config;
pub mod types;

pub use config::{ConfigError, ShaderPaths, ViewerConfig};
pub use types::{ModelId, MoveDirection, ShaderId, TextureHandle, UniformValue};
