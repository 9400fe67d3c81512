//! Board-agnostic core logic for the eelog firmware
//!
//! This crate contains everything about the log that does not depend on
//! a specific bus implementation:
//!
//! - Device geometry and bus timing configuration
//! - Hardware abstraction traits (block transport, temperature sensor)
//! - Page-boundary chunking of writes
//! - The persisted cursor record and its restore/persist operations
//! - The circular log storage controller

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod storage;
pub mod traits;
