//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in eelog-core, written against the `eelog-hal` bus traits:
//!
//! - Serial EEPROM block transport (24FC256 and compatibles)
//! - Temperature sensors (TMP100)
//! - An adapter from any `embedded-hal` I2C master to `eelog_hal::I2cBus`

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod eeprom;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
