//! Serial EEPROM drivers
//!
//! Block transports for the storage controller.

pub mod i2c;

pub use i2c::I2cEeprom;
