/// State of an edge-triggered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchState {
    #[default]
    Idle,
    Held,
}

/// Two-state machine that reports only the Idle -> Held transition.
///
/// OS key repeat delivers extra press events while a key is held; those land
/// in `Held` and report nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyLatch {
    state: LatchState,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Feed a press event. Returns `true` on the rising edge only.
    pub fn press(&mut self) -> bool {
        match self.state {
            LatchState::Idle => {
                self.state = LatchState::Held;
                true
            }
            LatchState::Held => false,
        }
    }

    /// Feed a release event.
    pub fn release(&mut self) {
        self.state = LatchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_fires() {
        let mut latch = KeyLatch::new();
        assert!(latch.press());
        assert_eq!(latch.state(), LatchState::Held);
    }

    #[test]
    fn repeated_press_does_not_fire() {
        let mut latch = KeyLatch::new();
        assert!(latch.press());
        assert!(!latch.press());
        assert!(!latch.press());
    }

    #[test]
    fn release_rearms() {
        let mut latch = KeyLatch::new();
        latch.press();
        latch.release();
        assert_eq!(latch.state(), LatchState::Idle);
        assert!(latch.press());
    }

    #[test]
    fn release_while_idle_is_harmless() {
        let mut latch = KeyLatch::new();
        latch.release();
        assert!(latch.press());
    }
}
