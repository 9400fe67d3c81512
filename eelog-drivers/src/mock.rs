//! Test doubles shared by the driver tests

use core::cell::Cell;

use eelog_hal::Clock;
use embedded_hal::delay::DelayNs;

/// Clock that advances by `step_ms` every time it is read
pub(crate) struct TickClock {
    now: Cell<u64>,
    step_ms: u64,
}

impl TickClock {
    pub fn new(step_ms: u64) -> Self {
        Self {
            now: Cell::new(0),
            step_ms,
        }
    }
}

impl Clock for TickClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step_ms);
        now
    }
}

/// Delay that records what it was asked for
#[derive(Default)]
pub(crate) struct RecordingDelay {
    pub total_ms: u64,
    pub total_us: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.total_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}
