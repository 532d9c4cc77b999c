/// Threshold past which the animation clock wraps back to zero.
pub const ANIMATION_WRAP: f32 = 15.0;

/// Per-frame clock samples, in seconds since start.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    current: f32,
    delta: f32,
    last: f32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new clock sample and return the elapsed time since the previous one.
    pub fn tick(&mut self, now: f32) -> f32 {
        self.current = now;
        self.delta = now - self.last;
        self.last = now;
        self.delta
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

/// Looping scalar driving the animated model's translation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    value: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance by `dt`, resetting to zero instead of passing `ANIMATION_WRAP`.
    /// Negative steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        let next = self.value + dt.max(0.0);
        self.value = if next > ANIMATION_WRAP { 0.0 } else { next };
    }
}
