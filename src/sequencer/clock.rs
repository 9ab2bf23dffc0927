//! Time sources for driving the sequencer.
use std::time::{Duration, Instant};

/// Monotonic time measured from the clock's own origin.
pub(crate) trait Clock {
    fn now(&self) -> Duration;
    /// Block (or jump) until `now() >= deadline`.
    fn sleep_until(&mut self, deadline: Duration);
}

pub(crate) struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&mut self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Virtual time: sleeping jumps straight to the deadline.
#[derive(Debug, Default)]
pub(crate) struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
