//! Circular log storage controller
//!
//! Owns the write cursor, read cursor, used-size counter and wrap flag for
//! one physical device, and keeps the first three of those persisted in
//! the device's metadata region.
//!
//! # Write path
//!
//! ```text
//! write(data)
//!   │  busy?/absent?/not restored? ──► NotReady (nothing touched)
//!   ▼
//! ┌──────────── per chunk ────────────┐
//! │ chunk = min(room in page, left)   │
//! │ transport.write(cursor, chunk)    │──► error: WriteError { committed }
//! │ cursor += chunk (wrap at end)     │
//! │ used += chunk (cap at capacity)   │
//! │ settle (delay or ack poll)        │
//! └───────────────────────────────────┘
//!   ▼
//! persist metadata (failure is logged, not returned)
//! ```
//!
//! The controller is single-owner: exactly one instance per device, all
//! operations run to completion on the caller's thread. Sharing it between
//! execution contexts requires an external lock around the whole
//! controller.

use embedded_hal::delay::DelayNs;

use super::error::{StorageError, WriteError};
use super::metadata::{self, LogMetadata};
use super::page::{chunk_len, page_chunks};
use super::state::{OperationState, Presence};
use super::{settle, ERASED_BYTE};
use crate::config::{DeviceGeometry, StorageConfig, MAX_PAGE_SIZE};
use crate::traits::BlockTransport;

/// Snapshot of the log bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogStatus {
    pub presence: Presence,
    pub write_cursor: u16,
    pub read_cursor: u16,
    pub used_size: u16,
    /// Usable bytes in the data region
    pub capacity: u32,
    pub has_wrapped: bool,
}

impl LogStatus {
    /// Whether the log has filled the device at least once
    pub fn is_full(&self) -> bool {
        self.used_size as u32 >= self.capacity
    }
}

/// Circular log over a page-organized memory device
pub struct StorageController<T, D> {
    transport: T,
    delay: D,
    config: StorageConfig,
    presence: Presence,
    state: OperationState,
    /// Cursors came from a successful restore or a reset
    restored: bool,
    write_cursor: u16,
    read_cursor: u16,
    used_size: u16,
    has_wrapped: bool,
}

impl<T, D> StorageController<T, D>
where
    T: BlockTransport,
    D: DelayNs,
{
    /// Create a controller in the not-yet-probed state
    ///
    /// No bus traffic happens until [`init`](Self::init).
    pub fn new(transport: T, delay: D, config: StorageConfig) -> Self {
        let data_start = config.geometry.data_start;
        Self {
            transport,
            delay,
            config,
            presence: Presence::Unknown,
            state: OperationState::Idle,
            restored: false,
            write_cursor: data_start,
            read_cursor: data_start,
            used_size: 0,
            has_wrapped: false,
        }
    }

    /// Create a controller and run [`init`](Self::init) on it
    ///
    /// Callers that want to recover from [`StorageError::Initialization`]
    /// by erasing should use [`new`](Self::new) and `init` instead, since
    /// the controller is dropped on error here.
    pub fn open(transport: T, delay: D, config: StorageConfig) -> Result<Self, StorageError> {
        let mut controller = Self::new(transport, delay, config);
        controller.init()?;
        Ok(controller)
    }

    /// Probe the device and restore the persisted cursors
    ///
    /// - Absent device: returns `Ok`, [`check_status`](Self::check_status)
    ///   reports [`Presence::NotPresent`] and every operation fails with
    ///   [`StorageError::NotReady`].
    /// - Metadata unreadable: returns [`StorageError::Initialization`]. The
    ///   log stays unusable until `init` is retried successfully or
    ///   [`erase_all`](Self::erase_all) resets it.
    /// - Restored cursor outside the data region: clamped to `data_start`.
    ///
    /// May be called again to retry.
    pub fn init(&mut self) -> Result<(), StorageError> {
        self.config.geometry.validate()?;

        self.state = OperationState::Idle;
        self.restored = false;
        self.reset_cursors();

        self.presence = if self
            .transport
            .probe_presence(self.config.timings.probe_timeout_ms)
        {
            Presence::Present
        } else {
            Presence::NotPresent
        };

        if !self.presence.is_present() {
            #[cfg(feature = "defmt")]
            defmt::warn!("EEPROM not present, log disabled");
            return Ok(());
        }

        let geometry = self.config.geometry;
        let restored = metadata::restore(&mut self.transport, &geometry).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to restore log metadata: {:?}", e);
            StorageError::Initialization(e)
        })?;

        self.apply_restored(restored);
        self.restored = true;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Log restored: cursor={}, used={}, wrapped={}",
            self.write_cursor,
            self.used_size,
            self.has_wrapped
        );

        Ok(())
    }

    /// Whether an operation is in progress
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Device presence as found by the last [`init`](Self::init)
    pub fn check_status(&self) -> Presence {
        self.presence
    }

    /// Whether writes and reads are currently accepted
    pub fn is_usable(&self) -> bool {
        self.presence.is_present() && self.restored && !self.state.is_busy()
    }

    /// Snapshot of the bookkeeping
    pub fn status(&self) -> LogStatus {
        LogStatus {
            presence: self.presence,
            write_cursor: self.write_cursor,
            read_cursor: self.read_cursor,
            used_size: self.used_size,
            capacity: self.geometry().usable_size(),
            has_wrapped: self.has_wrapped,
        }
    }

    /// The persisted part of the bookkeeping
    pub fn metadata(&self) -> LogMetadata {
        LogMetadata {
            write_cursor: self.write_cursor,
            used_size: self.used_size,
            has_wrapped: self.has_wrapped,
        }
    }

    pub fn geometry(&self) -> &DeviceGeometry {
        &self.config.geometry
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Append `data` at the write cursor
    ///
    /// Splits the request at page boundaries and wraps to `data_start` at
    /// the device end. Metadata is persisted once, after the last chunk;
    /// if that persist fails the data is still on the device and the call
    /// succeeds.
    ///
    /// On a failed chunk the chunks before it stay written and counted.
    /// [`WriteError::committed`] says how many bytes made it.
    pub fn write(&mut self, data: &[u8]) -> Result<(), WriteError> {
        self.ensure_ready().map_err(WriteError::rejected)?;

        self.state = OperationState::Busy;
        let result = self.write_chunks(data);
        if result.is_ok() {
            self.persist_metadata();
        }
        self.state = OperationState::Idle;

        result
    }

    /// Fill `buf` from the read cursor and advance it
    ///
    /// The read cursor is independent of the write cursor and is not
    /// checked against it. A read running past the device end continues
    /// at `data_start`. On failure the cursor does not move.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), StorageError> {
        self.ensure_ready()?;

        self.state = OperationState::Busy;
        let result = self.read_from(self.read_cursor, buf);
        if let Ok(next) = result {
            self.read_cursor = next;
        }
        self.state = OperationState::Idle;

        result.map(|_| ())
    }

    /// Fill `length` bytes from `start` with the erased value
    ///
    /// Fire-and-forget: does nothing if the device is absent or busy, and
    /// stops filling at the first failed chunk. The range is clipped at the
    /// device end. An erase starting at `data_start` is a full reset of the
    /// log: cursors and counters return to their empty values and are
    /// persisted, even if part of the fill failed. Erases elsewhere leave
    /// the bookkeeping alone.
    pub fn erase(&mut self, start: u16, length: usize) {
        if !self.presence.is_present() || self.state.is_busy() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Erase skipped: device not ready");
            return;
        }

        self.state = OperationState::Busy;

        let end = (start as usize)
            .saturating_add(length)
            .min(self.geometry().total_size as usize);
        let length = end.saturating_sub(start as usize);
        self.fill_erased(start, length);

        if start == self.geometry().data_start {
            self.reset_cursors();
            if self.persist_metadata() {
                self.restored = true;
            }
        }

        self.state = OperationState::Idle;
    }

    /// Erase the whole data region and reset the log
    pub fn erase_all(&mut self) {
        let geometry = *self.geometry();
        self.erase(geometry.data_start, geometry.usable_size() as usize);
    }

    /// Move the read cursor to the oldest byte still in the log
    pub fn rewind(&mut self) {
        self.read_cursor = if self.has_wrapped {
            self.write_cursor
        } else {
            self.geometry().data_start
        };
    }

    /// Move the read cursor to `address`
    pub fn seek(&mut self, address: u16) -> Result<(), StorageError> {
        if !self.geometry().in_data_region(address as u32) {
            return Err(StorageError::InvalidAddress);
        }
        self.read_cursor = address;
        Ok(())
    }

    /// Give back the transport and delay
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    fn ensure_ready(&self) -> Result<(), StorageError> {
        if self.is_usable() {
            Ok(())
        } else {
            Err(StorageError::NotReady)
        }
    }

    fn reset_cursors(&mut self) {
        let empty = LogMetadata::empty(self.geometry().data_start);
        self.write_cursor = empty.write_cursor;
        self.read_cursor = empty.write_cursor;
        self.used_size = empty.used_size;
        self.has_wrapped = empty.has_wrapped;
    }

    fn apply_restored(&mut self, restored: LogMetadata) {
        let geometry = *self.geometry();
        let capacity = geometry.usable_size();

        self.write_cursor = if geometry.in_data_region(restored.write_cursor as u32) {
            restored.write_cursor
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Restored write cursor {} outside data region, clamping",
                restored.write_cursor
            );
            geometry.data_start
        };

        self.used_size = (restored.used_size as u32).min(capacity) as u16;
        self.has_wrapped = restored.has_wrapped;
        self.read_cursor = geometry.data_start;
    }

    fn write_chunks(&mut self, data: &[u8]) -> Result<(), WriteError> {
        let geometry = *self.geometry();
        let timings = self.config.timings;
        let mut offset = 0;

        while offset < data.len() {
            let len = chunk_len(
                self.write_cursor as u32,
                data.len() - offset,
                geometry.page_size,
            );

            self.transport
                .write(self.write_cursor, &data[offset..offset + len])
                .map_err(|e| WriteError {
                    committed: offset,
                    error: e.into(),
                })?;

            offset += len;
            self.advance_write(len);

            settle(&mut self.transport, &mut self.delay, &timings).map_err(|e| WriteError {
                committed: offset,
                error: e.into(),
            })?;
        }

        Ok(())
    }

    /// Move the write cursor past `len` freshly written bytes
    fn advance_write(&mut self, len: usize) {
        let geometry = *self.geometry();
        let capacity = geometry.usable_size();

        let next = self.write_cursor as u32 + len as u32;
        if next >= geometry.total_size {
            self.write_cursor = geometry.data_start;
            self.has_wrapped = true;
        } else {
            self.write_cursor = next as u16;
        }

        let used = self.used_size as u32 + len as u32;
        if used >= capacity {
            self.used_size = capacity as u16;
            self.has_wrapped = true;
        } else {
            self.used_size = used as u16;
        }
    }

    /// Read into `buf` starting at `cursor`; returns the cursor after it
    fn read_from(&mut self, mut cursor: u16, buf: &mut [u8]) -> Result<u16, StorageError> {
        let geometry = *self.geometry();
        let mut done = 0;

        while done < buf.len() {
            let until_end = (geometry.total_size - cursor as u32) as usize;
            let len = until_end.min(buf.len() - done);

            self.transport.read(cursor, &mut buf[done..done + len])?;

            done += len;
            let next = cursor as u32 + len as u32;
            cursor = if next >= geometry.total_size {
                geometry.data_start
            } else {
                next as u16
            };
        }

        Ok(cursor)
    }

    /// Write the erased value over `[start, start + length)`, stopping at
    /// the first failed chunk
    fn fill_erased(&mut self, start: u16, length: usize) {
        let geometry = *self.geometry();
        let timings = self.config.timings;
        let blank = [ERASED_BYTE; MAX_PAGE_SIZE];

        for chunk in page_chunks(start as u32, length, geometry.page_size) {
            let written = self
                .transport
                .write(chunk.address as u16, &blank[..chunk.len])
                .and_then(|()| settle(&mut self.transport, &mut self.delay, &timings));

            if let Err(_e) = written {
                #[cfg(feature = "defmt")]
                defmt::warn!("Erase aborted at {}: {:?}", chunk.address, _e);
                return;
            }
        }
    }

    /// Persist the cursor record; failure is logged and reported as false
    fn persist_metadata(&mut self) -> bool {
        let meta = self.metadata();
        let result = metadata::persist(
            &mut self.transport,
            &mut self.delay,
            &self.config.geometry,
            &self.config.timings,
            &meta,
        );

        match result {
            Ok(()) => true,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Log metadata not persisted: {:?}", _e);
                false
            }
        }
    }
}
