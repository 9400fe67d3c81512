//! STM32F1-specific HAL for the eelog firmware
//!
//! This crate provides STM32F1-specific implementations of the
//! `eelog-hal` traits. It supports:
//!
//! - STM32F103C8 (Blue Pill)
//! - STM32F103CB
//!
//! # Features
//!
//! - `stm32f103c8` / `stm32f103cb` - Chip selection
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware creates the embassy-stm32 I2C peripheral in blocking
//! mode, wraps it in [`i2c::BlockingI2c`] and, when several drivers sit
//! on the same bus, hands each of them a [`i2c::SharedI2c`].

#![no_std]

pub mod i2c;
pub mod time;

pub use i2c::{BlockingI2c, SharedI2c};
pub use time::EmbassyClock;
