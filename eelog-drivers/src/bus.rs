//! `embedded-hal` bus adapter
//!
//! Lets any blocking `embedded_hal::i2c::I2c` master (chip HALs, bus
//! sharing wrappers, test doubles) drive the eelog drivers.

use eelog_hal::{I2cBus, I2cBusError};
use embedded_hal::i2c::{Error, ErrorKind, I2c};

/// `embedded-hal` I2C master as an [`I2cBus`]
pub struct HalI2c<I2C> {
    i2c: I2C,
}

impl<I2C> HalI2c<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Get the wrapped bus back
    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

/// Map an `embedded-hal` error onto the HAL error set
pub fn map_error<E: Error>(e: E) -> I2cBusError {
    match e.kind() {
        ErrorKind::Bus => I2cBusError::Bus,
        ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
        ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
        ErrorKind::Overrun => I2cBusError::Overrun,
        _ => I2cBusError::Other,
    }
}

impl<I2C: I2c> I2cBus for HalI2c<I2C> {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cBusError> {
        self.i2c.write(address, data).map_err(map_error)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cBusError> {
        self.i2c.read(address, buf).map_err(map_error)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cBusError> {
        self.i2c
            .write_read(address, write_data, read_buf)
            .map_err(map_error)
    }
}
