use std::time::{Duration, Instant};

/// Shortest delta a tick reports.
pub const MIN_DT: Duration = Duration::from_micros(100);

/// Longest delta a tick reports; a stalled or dragged window resumes from here.
pub const MAX_DT: Duration = Duration::from_millis(250);

/// Timing handed to `App::on_update` once per redraw.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, within the clock's bounds.
    pub dt: f32,
    pub now: Instant,
    /// 0 for the first tick after load.
    pub frame_index: u64,
}

/// Measures the wall time between redraws.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    ticks: u64,
    min_dt: Duration,
    max_dt: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(MIN_DT, MAX_DT)
    }

    pub fn with_clamps(min_dt: Duration, max_dt: Duration) -> Self {
        debug_assert!(min_dt <= max_dt);
        Self {
            last: Instant::now(),
            ticks: 0,
            min_dt,
            max_dt,
        }
    }

    /// Moves the baseline to now, so load time is not billed to the first tick.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.min_dt, self.max_dt);
        self.last = now;

        let frame_index = self.ticks;
        self.ticks = self.ticks.wrapping_add(1);

        FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
