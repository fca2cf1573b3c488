use std::time::{Duration, Instant};

/// Timer for tracking frame timing and elapsed time.
///
/// This is the render-loop clock: the host calls [`tick`](Self::tick) once
/// per rendered frame and forwards [`dt_seconds`](Self::dt_seconds) to the
/// avatar.
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Updates the timer from the wall clock.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
    }

    /// Advances the timer by a fixed step instead of reading the wall clock.
    ///
    /// Used by headless hosts and tests that need reproducible deltas.
    pub fn tick_fixed(&mut self, step: Duration) {
        self.delta = step;
        self.elapsed += step;
        self.last_update += step;
        self.frame_count += 1;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ticks_accumulate() {
        let mut timer = Timer::new();
        timer.tick_fixed(Duration::from_millis(16));
        timer.tick_fixed(Duration::from_millis(16));

        assert_eq!(timer.frame_count, 2);
        assert_eq!(timer.elapsed, Duration::from_millis(32));
        assert!((timer.dt_seconds() - 0.016).abs() < 1e-6);
    }
}
