//! Bus timing
//!
//! Every wait on the device is bounded. These values set the bounds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 24FC256 internal write cycle (tWC max)
pub const DEFAULT_WRITE_CYCLE_MS: u32 = 5;

/// Time allowed for the presence probe at startup
pub const DEFAULT_PROBE_TIMEOUT_MS: u32 = 100;

/// Time allowed for write acknowledgment polling
pub const DEFAULT_ACK_TIMEOUT_MS: u32 = 10;

/// Timing parameters for device transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusTimings {
    /// Fixed settle delay after each page write (ms)
    pub write_cycle_ms: u32,
    /// Presence probe bound (ms)
    pub probe_timeout_ms: u32,
    /// Acknowledgment polling bound (ms)
    pub ack_timeout_ms: u32,
    /// Poll the device for acknowledgment instead of sleeping a fixed
    /// `write_cycle_ms` after each page write
    pub ack_polling: bool,
}

impl Default for BusTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BusTimings {
    /// Fixed write-cycle delay, 24FC256 bounds
    pub const DEFAULT: Self = Self {
        write_cycle_ms: DEFAULT_WRITE_CYCLE_MS,
        probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        ack_timeout_ms: DEFAULT_ACK_TIMEOUT_MS,
        ack_polling: false,
    };

    /// Defaults with acknowledgment polling enabled
    pub const fn with_ack_polling() -> Self {
        Self {
            ack_polling: true,
            ..Self::DEFAULT
        }
    }
}
