//! Clocks for the run loop
//!
//! Provides the tick type and two clock implementations:
//! - Manual clock (tests, simulation; advances only when told)
//! - System clock (host builds; `std::time::Instant` since construction)
//!
//! On the node itself the board's RTC tick implements
//! [`TimeSource`] and [`Idle`] directly.

use crate::traits::{Idle, TimeSource};

/// Milliseconds since boot
pub type Timestamp = u64;

/// Clock that moves only when advanced
///
/// Waiting on it jumps straight to the deadline, so a simulated day of node
/// operation runs in microseconds.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Create a clock at `start`
    pub fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Jump to an absolute tick (never backwards)
    pub fn set(&mut self, now: Timestamp) {
        self.now = self.now.max(now);
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: Timestamp) {
        self.now = self.now.saturating_add(ms);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

impl Idle for ManualClock {
    fn wait_until(&mut self, deadline: Option<Timestamp>) {
        if let Some(deadline) = deadline {
            self.set(deadline);
        }
    }
}

/// Wall-clock driven time source (requires std)
///
/// Ticks count from construction. Waiting sleeps the thread; without a
/// deadline it sleeps for [`SystemClock::MAX_IDLE_MS`] so events posted from
/// other threads are still noticed.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Longest single sleep when nothing is planned
    pub const MAX_IDLE_MS: Timestamp = 1_000;

    /// Start counting at 0
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

#[cfg(feature = "std")]
impl Idle for SystemClock {
    fn wait_until(&mut self, deadline: Option<Timestamp>) {
        let now = self.now();
        let wait = match deadline {
            Some(deadline) => deadline.saturating_sub(now).min(Self::MAX_IDLE_MS),
            None => Self::MAX_IDLE_MS,
        };

        if wait > 0 {
            std::thread::sleep(std::time::Duration::from_millis(wait));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);

        // Never backwards
        clock.set(10);
        assert_eq!(clock.now(), 1500);
    }

    #[test]
    fn manual_clock_jumps_to_deadline() {
        let mut clock = ManualClock::new(0);
        clock.wait_until(Some(10_000));
        assert_eq!(clock.now(), 10_000);

        // Past deadline returns immediately
        clock.wait_until(Some(5));
        assert_eq!(clock.now(), 10_000);

        clock.wait_until(None);
        assert_eq!(clock.now(), 10_000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let before = clock.now();
        clock.wait_until(Some(before + 2));
        assert!(clock.now() >= before);
    }
}
