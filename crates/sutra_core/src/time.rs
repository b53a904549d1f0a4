//! Deterministic time system
//!
//! Fixed 60Hz tick rate. Real elapsed time accumulates and is drained in
//! whole ticks so simulation stepping stays frame-rate independent.

use std::time::Duration;

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666);
/// Tick length in seconds, the `dt` handed to simulation steps.
pub const TICK_SECS: f32 = 1.0 / TICK_RATE_HZ as f32;

/// Upper bound on ticks drained per frame. Keeps a long stall (window
/// drag, debugger pause) from snowballing into a burst of catch-up work.
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Simulation time tracker
pub struct SimulationTime {
    tick_count: u64,
    accumulator: Duration,
    total: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            accumulator: Duration::ZERO,
            total: Duration::ZERO,
        }
    }

    /// Feed real elapsed time and return how many fixed ticks to run.
    pub fn advance(&mut self, real_elapsed: Duration) -> u32 {
        self.accumulator += real_elapsed;
        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK_DURATION;
            self.tick_count += 1;
            self.total += TICK_DURATION;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            // Drop the backlog rather than chasing it.
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Total simulated time in seconds.
    pub fn seconds(&self) -> f32 {
        self.total.as_secs_f32()
    }

    pub fn reset(&mut self) {
        self.tick_count = 0;
        self.accumulator = Duration::ZERO;
        self.total = Duration::ZERO;
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ticks_drain_from_accumulator() {
        let mut time = SimulationTime::new();
        assert_eq!(time.advance(Duration::from_micros(10_000)), 0);
        // 10ms carried over + 10ms = 20ms -> one 16.666ms tick.
        assert_eq!(time.advance(Duration::from_micros(10_000)), 1);
        assert_eq!(time.tick_count(), 1);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut time = SimulationTime::new();
        let ticks = time.advance(Duration::from_secs(2));
        assert_eq!(ticks, 5);
        // Backlog is dropped, so the next small step yields no burst.
        assert_eq!(time.advance(Duration::from_micros(1_000)), 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut time = SimulationTime::new();
        time.advance(Duration::from_millis(100));
        time.reset();
        assert_eq!(time.tick_count(), 0);
        assert_eq!(time.seconds(), 0.0);
    }
}
