//! Circular log storage
//!
//! Presents the data region of the device as an append-only ring with a
//! persisted write cursor:
//!
//! - [`page`]: splits writes so no transaction crosses a page boundary
//! - [`metadata`]: the cursor record kept at the head of the device
//! - [`controller`]: cursors, wraparound, and the busy/idle guard

pub mod controller;
pub mod error;
pub mod metadata;
pub mod page;
pub mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use controller::{LogStatus, StorageController};
pub use error::{StorageError, WriteError};
pub use metadata::LogMetadata;
pub use page::{chunk_len, page_chunks, Chunk, PageChunks};
pub use state::{OperationState, Presence};

use embedded_hal::delay::DelayNs;

use crate::config::BusTimings;
use crate::traits::{BlockTransport, TransportError};

/// Erased EEPROM cell value
pub const ERASED_BYTE: u8 = 0xFF;

/// Wait for the device to commit the page just written
///
/// Either sleeps the fixed write cycle or polls for acknowledgment,
/// depending on `timings.ack_polling`. The device ignores new
/// transactions until the cycle completes.
pub(crate) fn settle<T, D>(
    transport: &mut T,
    delay: &mut D,
    timings: &BusTimings,
) -> Result<(), TransportError>
where
    T: BlockTransport + ?Sized,
    D: DelayNs + ?Sized,
{
    if timings.ack_polling {
        transport.poll_ready(timings.ack_timeout_ms)
    } else {
        delay.delay_ms(timings.write_cycle_ms);
        Ok(())
    }
}
