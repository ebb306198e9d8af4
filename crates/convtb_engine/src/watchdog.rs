//! Liveness monitoring over the stimulus program's step counter.

/// Detects stalled progress.
///
/// The hardware offers no centralized "I am stuck" signal, so progress is
/// inferred from the test program's step counter: every cycle in which the
/// counter fails to change increments a stall count, and exceeding the
/// configured budget trips the watchdog. Any change resets the count.
#[derive(Debug)]
pub struct Watchdog {
    timeout: u64,
    stalled: u64,
    prev_step: u64,
}

impl Watchdog {
    /// Creates a watchdog with the given stall budget in cycles.
    pub fn new(timeout: u64) -> Self {
        Self {
            timeout,
            stalled: 0,
            prev_step: 0,
        }
    }

    /// Feeds this cycle's step counter value; returns `true` when the
    /// stall budget has been exceeded.
    pub fn update(&mut self, step: u64) -> bool {
        if step != self.prev_step {
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.prev_step = step;
        self.stalled > self.timeout
    }

    /// Cycles since the step counter last changed.
    pub fn stalled_cycles(&self) -> u64 {
        self.stalled
    }
}
