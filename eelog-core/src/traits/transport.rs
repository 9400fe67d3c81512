//! Block transport trait
//!
//! Addressed access to the raw bytes of the memory device. The storage
//! controller never talks to the bus directly; it goes through this trait.

/// Errors from a single device transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Device did not acknowledge
    Nack,
    /// Bus-level failure
    Bus,
    /// Bounded wait for the device expired
    Timeout,
    /// Payload does not fit in one transaction
    PayloadTooLarge,
}

/// Addressed raw-byte access to the memory device
///
/// Each method is one bus transaction (or one bounded polling loop).
/// Timeouts are owned by the implementation.
pub trait BlockTransport {
    /// Check whether the device answers on the bus
    ///
    /// Implementations may retry internally, but must give up once
    /// `timeout_ms` has elapsed.
    fn probe_presence(&mut self, timeout_ms: u32) -> bool;

    /// Write `data` starting at `address` in a single transaction
    ///
    /// Callers keep `data` within one physical page.
    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), TransportError>;

    /// Read `buf.len()` bytes starting at `address`
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), TransportError>;

    /// Wait for the device to finish its internal write cycle
    ///
    /// Returns [`TransportError::Timeout`] if it is still busy after
    /// `timeout_ms`.
    fn poll_ready(&mut self, timeout_ms: u32) -> Result<(), TransportError>;
}

impl<T: BlockTransport + ?Sized> BlockTransport for &mut T {
    fn probe_presence(&mut self, timeout_ms: u32) -> bool {
        T::probe_presence(self, timeout_ms)
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), TransportError> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), TransportError> {
        T::read(self, address, buf)
    }

    fn poll_ready(&mut self, timeout_ms: u32) -> Result<(), TransportError> {
        T::poll_ready(self, timeout_ms)
    }
}
