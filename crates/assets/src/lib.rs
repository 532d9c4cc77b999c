//! Asset import: everything that turns files on disk into CPU-side data.
//!
//! The GPU backend consumes these types; nothing here touches a graphics API.
//! Built-in shader programs live here as WGSL text for the same reason.
//!
//! # Invariants
//! - Decoded images are always tightly packed RGBA8.
//! - Imported meshes are triangulated and single-indexed.

mod builtin;
mod image_data;
mod obj;
mod shader;

pub use builtin::{builtin_cube_shader, builtin_model_shader, program_sources};
pub use image_data::{ImageData, load_image, mip_chain, mip_level_count};
pub use obj::{MeshData, ModelData, ModelVertex, load_obj};
pub use shader::ShaderSource;

use std::path::PathBuf;

/// Errors from asset import.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image decode error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("OBJ load error for {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
}

pub fn crate_info() -> &'static str {
    "cubeview-assets v0.1.0"
}
