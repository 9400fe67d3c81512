//! eelog Hardware Abstraction Layer
//!
//! This crate defines the bus and timekeeping traits that chip-specific
//! HALs (STM32F1, host mocks, ...) implement. Drivers in `eelog-drivers`
//! are written against these traits only, so the same EEPROM and sensor
//! code runs on the target and in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (eelog-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eelog-core / eelog-drivers             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eelog-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  eelog-hal-stm32f1                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Blocking I2C master operations
//! - [`time::Clock`] - Monotonic millisecond clock for bounded waits

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod time;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cBusError, I2cConfig};
pub use time::{Clock, Deadline};
