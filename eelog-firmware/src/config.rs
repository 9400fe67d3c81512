//! Board configuration
//!
//! Compiled-in settings for the Blue Pill logger board: 24FC256 and
//! TMP100 on I2C1 (PB6 = SCL, PB7 = SDA), both address pins low.

use eelog_core::config::{BusTimings, DeviceGeometry, StorageConfig};
use eelog_drivers::sensor::ConversionMode;
use eelog_hal::I2cConfig;

/// Shared sensor/EEPROM bus
pub const I2C: I2cConfig = I2cConfig::STANDARD;

/// Upper bound on one I2C transaction inside the peripheral driver
pub const I2C_TRANSACTION_TIMEOUT_MS: u64 = 25;

/// Log layout and timing
pub const STORAGE: StorageConfig =
    StorageConfig::new(DeviceGeometry::M24FC256, BusTimings::with_ack_polling());

/// Time between temperature samples
pub const SAMPLE_INTERVAL_S: u64 = 10 * 60;

/// Sensor is shut down between samples
pub const SENSOR_MODE: ConversionMode = ConversionMode::OneShot;

/// Completion poll period while a one-shot conversion runs
pub const CONVERSION_POLL_MS: u64 = 10;

/// Time between status reports
pub const STATUS_INTERVAL_S: u64 = 60;
