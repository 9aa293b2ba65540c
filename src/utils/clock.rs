use chrono::Utc;

/// Supplies the timestamp tick stored inside each block. The tick is opaque
/// to the ledger but enters the hashed image, so a deterministic clock gives
/// reproducible hashes across runs.
pub trait Clock {
    fn tick(&mut self) -> u64;
}

/// Wall-clock ticks: nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn tick(&mut self) -> u64 {
        Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64
    }
}

/// Monotonic counter clock, for deterministic tests and demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    next: u64,
}

impl FixedClock {
    pub fn starting_at(next: u64) -> Self {
        FixedClock { next }
    }
}

impl Clock for FixedClock {
    fn tick(&mut self) -> u64 {
        let tick = self.next;
        self.next += 1;
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_counts_up() {
        let mut clock = FixedClock::starting_at(7);
        assert_eq!(clock.tick(), 7);
        assert_eq!(clock.tick(), 8);
        assert_eq!(clock.tick(), 9);
    }

    #[test]
    fn system_clock_is_nondecreasing() {
        let mut clock = SystemClock;
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
    }
}
