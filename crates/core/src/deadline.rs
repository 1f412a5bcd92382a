//! Caller-supplied deadlines for cancellable long-running operations.

use std::time::{Duration, Instant};

/// A deadline a long-running operation (hybrid search, SSSP) is expected to
/// honor at every loop boundary, checked at least every 1024 iterations.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// No deadline: the operation runs to completion.
    pub fn none() -> Self {
        Deadline { at: None }
    }

    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Deadline {
            at: Some(Instant::now() + timeout),
        }
    }

    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        matches!(self.at, Some(at) if Instant::now() >= at)
    }

    /// Milliseconds elapsed past the deadline, or 0 if not expired/unset.
    pub fn elapsed_ms(&self) -> u64 {
        match self.at {
            Some(at) => Instant::now().saturating_duration_since(at).as_millis() as u64,
            None => 0,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::none()
    }
}

/// Checks a deadline every `PERIOD` calls, amortizing the `Instant::now()`
/// syscall over a cancellable loop. Matches §5's "at least every 1024
/// iterations" cancellation contract.
pub struct DeadlineChecker {
    deadline: Deadline,
    counter: u32,
}

const PERIOD: u32 = 1024;

impl DeadlineChecker {
    /// Wrap a deadline in a periodic checker.
    pub fn new(deadline: Deadline) -> Self {
        DeadlineChecker {
            deadline,
            counter: 0,
        }
    }

    /// Call once per loop iteration. Returns `true` if the deadline has
    /// expired (checked at least every 1024 calls; checked every call if
    /// `force` is true).
    pub fn tick(&mut self, force: bool) -> bool {
        self.counter = self.counter.wrapping_add(1);
        if force || self.counter % PERIOD == 0 {
            self.deadline.expired()
        } else {
            false
        }
    }

    /// Milliseconds elapsed past the deadline.
    pub fn elapsed_ms(&self) -> u64 {
        self.deadline.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_expires() {
        let d = Deadline::none();
        assert!(!d.expired());
    }

    #[test]
    fn zero_timeout_expires_immediately() {
        let d = Deadline::after(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(1));
        assert!(d.expired());
    }

    #[test]
    fn checker_forces_check_regardless_of_period() {
        let d = Deadline::after(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(1));
        let mut checker = DeadlineChecker::new(d);
        assert!(checker.tick(true));
    }

    #[test]
    fn checker_only_checks_on_period_boundary() {
        let d = Deadline::after(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(1));
        let mut checker = DeadlineChecker::new(d);
        for _ in 0..PERIOD - 1 {
            assert!(!checker.tick(false));
        }
        assert!(checker.tick(false));
    }
}
