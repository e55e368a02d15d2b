// SPDX-License-Identifier: Apache-2.0 OR MIT
// Bounded spin-then-sleep back-off for the polling loops

use std::time::Duration;

/// Spin/yield/sleep back-off used by producers waiting for a slot and by
/// the drain thread waiting for work.
///
/// The first `spin_limit` calls busy-spin, the next `yield_limit` calls yield
/// the thread, and every later call sleeps. The sleep starts at `min_sleep`
/// and doubles up to `max_sleep`, so a waiter never sleeps longer than
/// `max_sleep` before looking again.
#[derive(Debug, Clone)]
pub(crate) struct Backoff {
    step: u32,
    sleep: Duration,
    spin_limit: u32,
    yield_limit: u32,
    min_sleep: Duration,
    max_sleep: Duration,
}

impl Backoff {
    /// Producer side: the consumer is a full revolution behind, it will free
    /// the slot within one sink write, so stay close to the CPU.
    pub(crate) fn for_producer() -> Self {
        Self::new(64, 0, Duration::from_micros(1), Duration::from_micros(1))
    }

    /// Drain side: the ring is empty, poll with growing sleeps capped at 1ms.
    pub(crate) fn for_drain() -> Self {
        Self::new(32, 8, Duration::from_micros(50), Duration::from_millis(1))
    }

    fn new(spin_limit: u32, yield_limit: u32, min_sleep: Duration, max_sleep: Duration) -> Self {
        Self {
            step: 0,
            sleep: min_sleep,
            spin_limit,
            yield_limit,
            min_sleep,
            max_sleep,
        }
    }

    /// Wait a little before the next poll
    pub(crate) fn snooze(&mut self) {
        if self.step < self.spin_limit {
            std::hint::spin_loop();
        } else if self.step < self.spin_limit + self.yield_limit {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.sleep);
            self.sleep = (self.sleep * 2).min(self.max_sleep);
        }
        self.step = self.step.saturating_add(1);
    }

    /// Start over after the awaited condition was observed
    pub(crate) fn reset(&mut self) {
        self.step = 0;
        self.sleep = self.min_sleep;
    }

    /// True once the back-off has left the spinning phase
    #[cfg(test)]
    fn is_sleeping(&self) -> bool {
        self.step > self.spin_limit + self.yield_limit
    }
}
