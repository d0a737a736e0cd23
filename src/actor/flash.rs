//! One-shot hit flash timer

/// Remaining time treated as expired; absorbs f32 drift from summed frame steps
const EXPIRY_EPSILON: f32 = 1e-5;

/// Countdown started by a hit; blinks while running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitFlash {
    duration: f32,
    blink_interval: f32,
    /// Seconds left; flashing iff > 0
    timer: f32,
    /// Seconds since the flash started
    elapsed: f32,
}

impl HitFlash {
    /// Create an idle flash of `duration` seconds blinking every `blink_interval`
    pub fn new(duration: f32, blink_interval: f32) -> Self {
        Self {
            duration,
            blink_interval,
            timer: 0.0,
            elapsed: 0.0,
        }
    }

    /// Start over at full duration. Never extends a running flash.
    pub fn trigger(&mut self) {
        self.timer = self.duration;
        self.elapsed = 0.0;
    }

    /// Tick the running flash; expiry zeroes both timers
    pub fn advance(&mut self, dt: f32) {
        if !self.is_flashing() {
            return;
        }
        self.timer -= dt;
        self.elapsed += dt;
        if self.timer <= EXPIRY_EPSILON {
            self.timer = 0.0;
            self.elapsed = 0.0;
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.timer > 0.0
    }

    /// Seconds until the flash ends
    pub fn remaining(&self) -> f32 {
        self.timer
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Blink parity: hidden on odd intervals while flashing
    pub fn is_visible(&self) -> bool {
        if !self.is_flashing() {
            return true;
        }
        (self.elapsed / self.blink_interval) as u32 % 2 == 0
    }
}
