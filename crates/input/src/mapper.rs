use crate::action::Action;
use crate::latch::KeyLatch;
use cubeview_common::MoveDirection;
use std::collections::HashSet;

/// Keys the viewer reacts to. The platform layer drops everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    /// Spawns a cube on press.
    Space,
    /// While held, releasing Space does not re-arm the spawn latch.
    C,
    Escape,
}

/// Held keys polled every frame, in dispatch order.
const MOVE_BINDINGS: [(Key, MoveDirection); 4] = [
    (Key::W, MoveDirection::Forward),
    (Key::S, MoveDirection::Backward),
    (Key::A, MoveDirection::Left),
    (Key::D, MoveDirection::Right),
];

/// Converts absolute cursor positions into per-sample deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseTracker {
    last: Option<(f32, f32)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cursor position. Returns `(dx, dy)` with `dy` positive upward,
    /// or `None` for the first sample, which only sets the baseline.
    pub fn sample(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let delta = self.last.map(|(lx, ly)| (x - lx, ly - y));
        self.last = Some((x, y));
        delta
    }

    /// Forget the baseline so the next sample is discarded again.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Translates raw platform events into [`Action`]s.
///
/// Edge actions (spawn, exit, look, zoom) queue up as events arrive; held
/// movement keys are turned into actions when the frame drains the mapper.
#[derive(Debug, Default)]
pub struct InputMapper {
    held: HashSet<Key>,
    spawn_latch: KeyLatch,
    mouse: MouseTracker,
    pending: Vec<Action>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a key press or release.
    pub fn key_event(&mut self, key: Key, pressed: bool) {
        tracing::trace!(?key, pressed, "key event");
        if !pressed {
            self.held.remove(&key);
            self.rearm_spawn();
            return;
        }

        self.held.insert(key);
        match key {
            Key::Space => {
                if self.spawn_latch.press() {
                    self.pending.push(Action::SpawnCube);
                }
            }
            Key::Escape => self.pending.push(Action::Exit),
            Key::C | Key::W | Key::A | Key::S | Key::D => {}
        }
    }

    /// Feed an absolute cursor position in window pixels.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let Some((dx, dy)) = self.mouse.sample(x, y) {
            self.pending.push(Action::Look { dx, dy });
        }
    }

    /// Feed a vertical scroll-wheel delta.
    pub fn scroll(&mut self, dy: f32) {
        self.pending.push(Action::Zoom(dy));
    }

    /// Drop every held key, the spawn latch and the cursor baseline, as if
    /// all keys were released. Used when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.spawn_latch.release();
        self.mouse.reset();
    }

    /// The spawn latch returns to idle only once Space and C are both up.
    fn rearm_spawn(&mut self) {
        if !self.held.contains(&Key::Space) && !self.held.contains(&Key::C) {
            self.spawn_latch.release();
        }
    }

    /// Take all queued actions followed by one `Move` per held movement key.
    pub fn drain(&mut self) -> Vec<Action> {
        let mut actions = std::mem::take(&mut self.pending);
        actions.extend(
            MOVE_BINDINGS
                .iter()
                .filter(|(key, _)| self.held.contains(key))
                .map(|&(_, dir)| Action::Move(dir)),
        );
        actions
    }
}
