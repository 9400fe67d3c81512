//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Temperature reading signal (updated by sampler task)
/// Value is temperature in 0.1°C units (e.g., 250 = 25.0°C), or None for sensor fault
pub static TEMP_READING: Signal<CriticalSectionRawMutex, Option<i16>> = Signal::new();
