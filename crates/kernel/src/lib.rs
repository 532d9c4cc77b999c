//! Scene kernel: the spawned-cube registry and per-frame timing state.
//!
//! # Invariants
//! - The registry is append-only; iteration order is spawn order.
//! - A cube's position and bindings never change after spawn.
//! - The animation clock never leaves `[0, ANIMATION_WRAP]`.

pub mod registry;
pub mod timing;

pub use registry::{Cube, CubeRegistry, SPAWN_EXTENT, SpawnRng};
pub use timing::{ANIMATION_WRAP, AnimationClock, FrameTiming};
