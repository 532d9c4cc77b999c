//! wgpu render backend for cubeview.
//!
//! Implements [`cubeview_render::Graphics`] on top of wgpu. Draw calls are
//! recorded as they arrive and replayed into a single render pass on
//! `swap_buffers`, each with its own snapshot of the bound program's
//! uniforms at a dynamic offset.
//!
//! # Invariants
//! - Every shader program shares one uniform block layout and one vertex layout.
//! - `TextureHandle::INVALID` samples a black placeholder texel.
//! - A lost or outdated surface drops the frame; it never panics.

mod gpu;
mod uniforms;

pub use gpu::{GpuInitError, WgpuGraphics};
