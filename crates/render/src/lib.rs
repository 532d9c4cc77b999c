//! Rendering core: camera, renderer-agnostic graphics interface, frame driver.
//!
//! # Invariants
//! - The frame driver only reaches the GPU through [`Graphics`]; any backend
//!   that implements it (wgpu, or the recording backend) sees the same calls.
//! - Every frame is clear, cubes in spawn order, models, swap.
//! - Input is applied at the start of the frame it arrived before.

mod camera;
mod gfx;
mod recording;
mod viewer;

pub use camera::{Camera, FAR_PLANE, MAX_ZOOM, MIN_ZOOM, NEAR_PLANE, PITCH_LIMIT};
pub use gfx::{Graphics, Program, RenderError, ResourceLoader};
pub use recording::{GfxCommand, RecordedModel, RecordingGraphics};
pub use viewer::{
    CLEAR_COLOUR, CUBE_SHININESS, DIFFUSE_UNIT, FrameMatrices, LIGHT_COLOUR, LIGHT_POSITION,
    OBJECT_COLOUR, SPECULAR_UNIT, SceneAssets, Viewer, animated_model_matrix, cube_model_matrix,
    static_model_matrix,
};

pub fn crate_info() -> &'static str {
    "cubeview-render v0.1.0"
}
