//! Input mapping: raw platform events in, viewer actions out.
//!
//! # Invariants
//! - Key state changes only on press/release events, never on polling.
//! - The spawn action fires once per press edge, regardless of hold length.
//! - The first cursor sample never produces a look action.

pub mod action;
pub mod latch;
pub mod mapper;

pub use action::Action;
pub use latch::{KeyLatch, LatchState};
pub use mapper::{InputMapper, Key, MouseTracker};
