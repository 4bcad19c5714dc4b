use crate::catalog::DAY_TICKS;

/// Turns elapsed real time into whole simulation ticks.
#[derive(Debug, Clone)]
pub struct WorldClock {
    tick: u64,
    accumulated_ms: f64,
    tick_ms: f64,
}

impl WorldClock {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick: 0,
            accumulated_ms: 0.0,
            tick_ms,
        }
    }

    pub fn reset(&mut self) {
        self.tick = 0;
        self.accumulated_ms = 0.0;
    }

    /// Accumulates `elapsed_ms` and advances at most one tick. The
    /// accumulator is emptied whenever a tick fires.
    pub fn accumulate(&mut self, elapsed_ms: f64) -> bool {
        self.accumulated_ms += elapsed_ms.max(0.0);
        if self.accumulated_ms < self.tick_ms {
            return false;
        }
        self.accumulated_ms = 0.0;
        self.tick += 1;
        true
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    pub fn accumulated_ms(&self) -> f64 {
        self.accumulated_ms
    }

    /// True on every positive multiple of `period`.
    pub fn every(&self, period: u64) -> bool {
        period > 0 && self.tick > 0 && self.tick % period == 0
    }

    pub fn hour(&self) -> u64 {
        self.tick % DAY_TICKS
    }

    /// One-based day number.
    pub fn day(&self) -> u64 {
        self.tick / DAY_TICKS + 1
    }

    pub fn days_elapsed(&self) -> u64 {
        self.tick / DAY_TICKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_elapsed_fires_a_single_tick() {
        let mut clock = WorldClock::new(1000.0);
        assert!(!clock.accumulate(600.0));
        assert!(clock.accumulate(600.0));
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.accumulated_ms(), 0.0);
        assert!(clock.accumulate(10_000.0));
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn every_skips_tick_zero() {
        let mut clock = WorldClock::new(1.0);
        assert!(!clock.every(5));
        for _ in 0..10 {
            clock.accumulate(1.0);
        }
        assert!(clock.every(5));
        assert!(clock.every(10));
        assert!(!clock.every(3));
        assert!(!clock.every(0));
    }
}
