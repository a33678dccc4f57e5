//! Frame state shared by the animated lessons.

/// Base scale of the pulsing quad.
pub const BASE_SCALE: f32 = 0.5;

/// Relative amplitude of the scale pulse.
pub const PULSE_AMPLITUDE: f32 = 0.25;

/// Accumulated animation time.
///
/// Only elapsed time is integrated. Angle and scale are derived from it on
/// demand, so they never drift apart from the clock.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Motion {
    elapsed: f64,
}

impl Motion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances by one tick of `dt` seconds. Negative deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt as f64;
        }
    }

    /// Seconds since the lesson started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Angle in radians after turning at `rate` rad/s.
    #[inline]
    pub fn angle(&self, rate: f32) -> f32 {
        (self.elapsed * rate as f64) as f32
    }

    /// `(cos, sin)` of [`angle`](Self::angle).
    pub fn rotation(&self, rate: f32) -> (f32, f32) {
        let a = self.angle(rate);
        (a.cos(), a.sin())
    }

    /// `BASE_SCALE * (1 + PULSE_AMPLITUDE * sin(elapsed))`.
    pub fn pulse_scale(&self) -> f32 {
        BASE_SCALE * (1.0 + PULSE_AMPLITUDE * self.elapsed().sin())
    }
}
