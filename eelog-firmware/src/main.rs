//! eelog - Temperature Logger Firmware
//!
//! Main firmware binary for STM32F103 boards. Samples a TMP100 on a fixed
//! interval and appends the readings to a circular log in a 24FC256
//! serial EEPROM. The log's write cursor lives in the head of the same
//! chip, so logging resumes where it left off after a power cycle.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::i2c::I2c;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use eelog_core::storage::{Presence, StorageController, StorageError};
use eelog_drivers::eeprom::I2cEeprom;
use eelog_drivers::sensor::Tmp100;
use eelog_hal_stm32f1::i2c::peripheral_config;
use eelog_hal_stm32f1::{BlockingI2c, EmbassyClock, SharedI2c};

mod channels;
mod config;
mod log;
mod tasks;

// Shared I2C bus (must live forever for the driver handles)
static I2C_BUS: StaticCell<log::Bus> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("eelog firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    // I2C1: PB6 = SCL, PB7 = SDA
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB6,
        p.PB7,
        peripheral_config(&config::I2C, config::I2C_TRANSACTION_TIMEOUT_MS),
    );
    let bus: &'static log::Bus = I2C_BUS.init(Mutex::new(RefCell::new(BlockingI2c::new(i2c))));

    // Open the log before any task can touch it
    let eeprom = I2cEeprom::new(SharedI2c::new(bus), EmbassyClock, Delay);
    let mut storage = StorageController::new(eeprom, Delay, config::STORAGE);
    open_log(&mut storage);
    log::install(storage);

    let mut sensor = Tmp100::new(SharedI2c::new(bus), EmbassyClock, Delay, config::SENSOR_MODE);
    match sensor.check_status() {
        Ok(()) => info!("TMP100 found"),
        Err(e) => warn!("TMP100 not responding: {:?}", e),
    }

    spawner.spawn(tasks::sampler_task(sensor)).unwrap();
    spawner.spawn(tasks::logger_task()).unwrap();
    spawner.spawn(tasks::status_task()).unwrap();

    info!("All tasks spawned");
}

/// Probe the EEPROM and restore the log, erasing it if the cursor record
/// cannot be read
fn open_log(storage: &mut log::Log) {
    match storage.init() {
        Ok(()) if storage.check_status() == Presence::NotPresent => {
            warn!("EEPROM not found, samples will not be stored");
        }
        Ok(()) => {
            let status = storage.status();
            info!(
                "Log opened: cursor={}, used={}/{}, wrapped={}",
                status.write_cursor, status.used_size, status.capacity, status.has_wrapped
            );
        }
        Err(StorageError::Initialization(e)) => {
            warn!("Log metadata unreadable ({:?}), erasing log", e);
            storage.erase_all();
            if storage.is_usable() {
                info!("Log erased");
            } else {
                error!("Log erase failed, storage disabled");
            }
        }
        Err(e) => {
            error!("Log init failed: {:?}", e);
        }
    }
}
