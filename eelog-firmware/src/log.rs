//! The sample log
//!
//! One storage controller for the whole firmware, kept behind a blocking
//! mutex. Tasks reach it only through [`with_log`], so log operations
//! never overlap.

use core::cell::RefCell;

use eelog_core::storage::StorageController;
use eelog_drivers::eeprom::I2cEeprom;
use eelog_drivers::sensor::Tmp100;
use eelog_hal_stm32f1::{BlockingI2c, EmbassyClock, SharedI2c};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Delay;

/// I2C1, shared by the EEPROM and the sensor
pub type Bus = Mutex<ThreadModeRawMutex, RefCell<BlockingI2c<'static>>>;
pub type BusHandle = SharedI2c<'static, ThreadModeRawMutex, BlockingI2c<'static>>;

pub type Eeprom = I2cEeprom<BusHandle, EmbassyClock, Delay>;
pub type Log = StorageController<Eeprom, Delay>;
pub type Sensor = Tmp100<BusHandle, EmbassyClock, Delay>;

static LOG: Mutex<ThreadModeRawMutex, RefCell<Option<Log>>> = Mutex::new(RefCell::new(None));

/// Hand the opened log to the tasks
pub fn install(log: Log) {
    LOG.lock(|cell| {
        cell.replace(Some(log));
    });
}

/// Run `f` with exclusive access to the log
///
/// Returns `None` before [`install`].
pub fn with_log<R>(f: impl FnOnce(&mut Log) -> R) -> Option<R> {
    LOG.lock(|cell| cell.borrow_mut().as_mut().map(f))
}

/// One logged temperature sample
///
/// Stored as 4 bytes, big-endian: sequence number, then temperature in
/// 0.1°C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Sample {
    pub sequence: u16,
    pub temp_x10: i16,
}

impl Sample {
    pub const LEN: usize = 4;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let [s_hi, s_lo] = self.sequence.to_be_bytes();
        let [t_hi, t_lo] = self.temp_x10.to_be_bytes();
        [s_hi, s_lo, t_hi, t_lo]
    }
}
