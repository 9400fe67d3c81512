//! I2C bus driver for STM32F1
//!
//! Blocking master access for the serial EEPROM and the temperature
//! sensor, which share I2C1.

use core::cell::RefCell;

use eelog_hal::{I2cBus, I2cBusError, I2cConfig};
use embassy_stm32::i2c::{Config, Error as I2cError, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Duration;

/// Map an embassy-stm32 I2C error onto the HAL error set
pub fn map_error(e: I2cError) -> I2cBusError {
    match e {
        I2cError::Bus => I2cBusError::Bus,
        I2cError::Arbitration => I2cBusError::ArbitrationLost,
        I2cError::Nack => I2cBusError::Nack,
        I2cError::Timeout => I2cBusError::Timeout,
        I2cError::Overrun => I2cBusError::Overrun,
        _ => I2cBusError::Other,
    }
}

/// Build the peripheral configuration
///
/// `timeout_ms` bounds every single transaction inside embassy-stm32.
pub fn peripheral_config(config: &I2cConfig, timeout_ms: u64) -> Config {
    let mut i2c_config = Config::default();
    i2c_config.frequency = Hertz(config.frequency);
    i2c_config.timeout = Duration::from_millis(timeout_ms);
    i2c_config
}

/// Blocking I2C master
pub struct BlockingI2c<'d> {
    i2c: I2c<'d, Blocking, Master>,
}

impl<'d> BlockingI2c<'d> {
    pub fn new(i2c: I2c<'d, Blocking, Master>) -> Self {
        Self { i2c }
    }
}

impl I2cBus for BlockingI2c<'_> {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cBusError> {
        self.i2c.blocking_write(address, data).map_err(map_error)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cBusError> {
        self.i2c.blocking_read(address, buf).map_err(map_error)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cBusError> {
        self.i2c
            .blocking_write_read(address, write_data, read_buf)
            .map_err(map_error)
    }
}

/// Handle to a bus shared by several drivers
///
/// Each call locks the bus for exactly one transaction, so transactions
/// from different drivers never interleave.
pub struct SharedI2c<'a, M: RawMutex, B> {
    bus: &'a Mutex<M, RefCell<B>>,
}

impl<'a, M: RawMutex, B> SharedI2c<'a, M, B> {
    pub fn new(bus: &'a Mutex<M, RefCell<B>>) -> Self {
        Self { bus }
    }
}

impl<M: RawMutex, B: I2cBus> I2cBus for SharedI2c<'_, M, B> {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cBusError> {
        self.bus.lock(|bus| bus.borrow_mut().write(address, data))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cBusError> {
        self.bus.lock(|bus| bus.borrow_mut().read(address, buf))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cBusError> {
        self.bus
            .lock(|bus| bus.borrow_mut().write_read(address, write_data, read_buf))
    }

    fn probe(&mut self, address: u8) -> bool {
        self.bus.lock(|bus| bus.borrow_mut().probe(address))
    }
}
