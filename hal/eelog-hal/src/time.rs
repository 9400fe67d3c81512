//! Monotonic time abstractions
//!
//! Bounded waits (device-ready polling, conversion polling) are written as
//! loops that compare elapsed wall-clock time against a limit. This module
//! provides the clock those loops read.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (typically boot)
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        C::now_ms(self)
    }
}

/// A point in time after which a bounded wait gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    start_ms: u64,
    timeout_ms: u32,
}

impl Deadline {
    /// Start a deadline `timeout_ms` from now
    pub fn start<C: Clock + ?Sized>(clock: &C, timeout_ms: u32) -> Self {
        Self {
            start_ms: clock.now_ms(),
            timeout_ms,
        }
    }

    /// Milliseconds elapsed since the deadline was started
    pub fn elapsed_ms<C: Clock + ?Sized>(&self, clock: &C) -> u64 {
        clock.now_ms().wrapping_sub(self.start_ms)
    }

    /// Whether more than `timeout_ms` has passed
    pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        self.elapsed_ms(clock) > u64::from(self.timeout_ms)
    }
}
