//! I2C bus abstractions
//!
//! Provides traits for blocking I2C master operations that can be
//! implemented by chip-specific HALs. Every call is one complete bus
//! transaction; the bus serializes all traffic, so callers never have
//! more than one transaction in flight.

/// Error from I2C operations
///
/// Chip HALs map their native error types onto this set so that
/// drivers can tell an absent/busy device (`Nack`) from a broken bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error (misplaced START/STOP)
    Bus,
    /// Arbitration lost to another master
    ArbitrationLost,
    /// Address or data byte not acknowledged
    Nack,
    /// Peripheral-level timeout
    Timeout,
    /// Data overrun/underrun
    Overrun,
    /// Other error
    Other,
}

impl I2cBusError {
    /// Whether the device simply did not answer
    ///
    /// EEPROMs stop acknowledging their address while an internal
    /// write cycle is in progress, so a NACK is often "busy", not "gone".
    pub fn is_nack(self) -> bool {
        matches!(self, I2cBusError::Nack)
    }
}

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cBusError>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cBusError>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register or memory address then
    /// read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (register or memory address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cBusError>;

    /// Check whether a device acknowledges its address
    ///
    /// Issues an address-only write. The default implementation treats
    /// any error as "not acknowledged".
    fn probe(&mut self, address: u8) -> bool {
        self.write(address, &[]).is_ok()
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cBusError> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cBusError> {
        T::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cBusError> {
        T::write_read(self, address, write_data, read_buf)
    }

    fn probe(&mut self, address: u8) -> bool {
        T::probe(self, address)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}
