//! Persisted cursor record
//!
//! The controller keeps its bookkeeping in the same device it manages, in
//! a small record at `metadata_addr`:
//!
//! | Byte | Content                  |
//! |------|--------------------------|
//! | 0    | write cursor, high byte  |
//! | 1    | write cursor, low byte   |
//! | 2    | used size, high byte     |
//! | 3    | used size, low byte      |
//! | 4    | wrap flag (0/1)          |
//! | 5    | spare (extended layout)  |
//!
//! Restore does not range-check the values; the controller does.

use embedded_hal::delay::DelayNs;

use super::page::page_chunks;
use super::settle;
use crate::config::{BusTimings, DeviceGeometry};
use crate::traits::{BlockTransport, TransportError};

/// Bytes read back on restore
pub const RECORD_LEN: usize = 5;

/// Bytes written when the metadata region has room for the spare byte
pub const EXTENDED_RECORD_LEN: usize = 6;

/// Value written to the spare byte
const SPARE: u8 = 0x00;

/// The controller state that survives a restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogMetadata {
    /// Next address the log writes to
    pub write_cursor: u16,
    /// Bytes written so far, capped at the usable size
    pub used_size: u16,
    /// The log has wrapped or filled at least once
    pub has_wrapped: bool,
}

impl LogMetadata {
    /// State of an empty log
    pub const fn empty(data_start: u16) -> Self {
        Self {
            write_cursor: data_start,
            used_size: 0,
            has_wrapped: false,
        }
    }

    /// Serialize to the on-device layout
    pub fn to_bytes(&self) -> [u8; EXTENDED_RECORD_LEN] {
        let [wc_hi, wc_lo] = self.write_cursor.to_be_bytes();
        let [us_hi, us_lo] = self.used_size.to_be_bytes();
        [wc_hi, wc_lo, us_hi, us_lo, self.has_wrapped as u8, SPARE]
    }

    /// Deserialize from the on-device layout
    ///
    /// Any non-zero wrap byte reads as wrapped.
    pub fn from_bytes(bytes: &[u8; RECORD_LEN]) -> Self {
        Self {
            write_cursor: u16::from_be_bytes([bytes[0], bytes[1]]),
            used_size: u16::from_be_bytes([bytes[2], bytes[3]]),
            has_wrapped: bytes[4] != 0,
        }
    }
}

/// Read the cursor record from the metadata region
pub fn restore<T>(transport: &mut T, geometry: &DeviceGeometry) -> Result<LogMetadata, TransportError>
where
    T: BlockTransport + ?Sized,
{
    let mut buf = [0u8; RECORD_LEN];
    transport.read(geometry.metadata_addr, &mut buf)?;
    Ok(LogMetadata::from_bytes(&buf))
}

/// Write the cursor record to the metadata region
///
/// Returns only after the device has committed the record, so the caller
/// may issue the next transaction immediately.
pub fn persist<T, D>(
    transport: &mut T,
    delay: &mut D,
    geometry: &DeviceGeometry,
    timings: &BusTimings,
    metadata: &LogMetadata,
) -> Result<(), TransportError>
where
    T: BlockTransport + ?Sized,
    D: DelayNs + ?Sized,
{
    let bytes = metadata.to_bytes();
    let len = (geometry.metadata_len as usize).min(EXTENDED_RECORD_LEN);

    for chunk in page_chunks(geometry.metadata_addr as u32, len, geometry.page_size) {
        transport.write(
            chunk.address as u16,
            &bytes[chunk.offset..chunk.offset + chunk.len],
        )?;
        settle(transport, delay, timings)?;
    }

    Ok(())
}
