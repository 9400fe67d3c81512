//! TMP100 digital temperature sensor
//!
//! 12-bit two's complement reading, 0.0625°C per LSB, left-justified in
//! the 16-bit temperature register. Integer-only conversion to 0.1°C.
//!
//! Two ways to take a reading:
//! - [`ConversionMode::Continuous`]: the part converts on its own and we
//!   just read the latest result.
//! - [`ConversionMode::OneShot`]: shut down between samples, trigger a
//!   single conversion and poll for completion. Suits long logging
//!   intervals.

use eelog_core::traits::{SensorError, TemperatureSensor};
use eelog_hal::{Clock, Deadline, I2cBus};
use embedded_hal::delay::DelayNs;

/// 7-bit bus address with ADD1/ADD0 tied low
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Temperature register pointer
const REG_TEMPERATURE: u8 = 0x00;
/// Configuration register pointer
const REG_CONFIG: u8 = 0x01;

/// Shutdown, 12-bit resolution
const CONFIG_SHUTDOWN_12BIT: u8 = 0xA0;
/// Shutdown, 12-bit resolution, start one conversion
const CONFIG_ONESHOT_12BIT: u8 = 0xE0;
/// Conversion in progress while set
const CONFIG_OS: u8 = 0x80;

/// Upper bound on a one-shot conversion
pub const CONVERSION_TIMEOUT_MS: u32 = 1_000;

/// Presence check attempts
pub const STATUS_RETRIES: u8 = 5;
/// Pause between presence check attempts
pub const STATUS_RETRY_DELAY_MS: u32 = 10;

/// Specified operating range in 0.1°C
pub const MIN_TEMP_X10: i16 = -550;
pub const MAX_TEMP_X10: i16 = 1250;

/// The operating range in raw counts: -55°C and 125°C are exact multiples
/// of 0.0625°C
const MIN_RAW: i16 = MIN_TEMP_X10 * 16 / 10;
const MAX_RAW: i16 = MAX_TEMP_X10 * 16 / 10;

/// How readings are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    /// Read the free-running result
    #[default]
    Continuous,
    /// Trigger and wait for a single conversion
    OneShot,
}

/// TMP100 on an I2C bus
pub struct Tmp100<BUS, CLK, D> {
    bus: BUS,
    clock: CLK,
    delay: D,
    address: u8,
    mode: ConversionMode,
}

impl<BUS, CLK, D> Tmp100<BUS, CLK, D>
where
    BUS: I2cBus,
    CLK: Clock,
    D: DelayNs,
{
    /// Create a sensor at [`DEFAULT_ADDRESS`]
    pub fn new(bus: BUS, clock: CLK, delay: D, mode: ConversionMode) -> Self {
        Self {
            bus,
            clock,
            delay,
            address: DEFAULT_ADDRESS,
            mode,
        }
    }

    /// Use a different bus address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ConversionMode) {
        self.mode = mode;
    }

    /// Check that the sensor acknowledges its address
    pub fn check_status(&mut self) -> Result<(), SensorError> {
        for attempt in 1..=STATUS_RETRIES {
            if self.bus.probe(self.address) {
                return Ok(());
            }
            if attempt < STATUS_RETRIES {
                self.delay.delay_ms(STATUS_RETRY_DELAY_MS);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("TMP100 at {=u8:#x} not responding", self.address);
        Err(SensorError::NotPresent)
    }

    /// Read the latest conversion result
    pub fn read_continuous(&mut self) -> Result<i16, SensorError> {
        let raw = self.read_raw()?;
        Self::raw_to_temp_x10(raw)
    }

    /// Trigger a single conversion and block until it is read
    ///
    /// Leaves the sensor shut down. Async callers should drive
    /// [`start_one_shot`](Self::start_one_shot) and
    /// [`conversion_done`](Self::conversion_done) themselves and wait on
    /// their own timer instead.
    pub fn read_one_shot(&mut self) -> Result<i16, SensorError> {
        self.start_one_shot()?;

        let deadline = Deadline::start(&self.clock, CONVERSION_TIMEOUT_MS);
        loop {
            if self.conversion_done()? {
                break;
            }
            if deadline.expired(&self.clock) {
                #[cfg(feature = "defmt")]
                defmt::warn!("TMP100 conversion timed out");
                return Err(SensorError::Timeout);
            }
            self.delay.delay_ms(1);
        }

        let raw = self.read_raw()?;
        Self::raw_to_temp_x10(raw)
    }

    /// Put the sensor in shutdown and start a single conversion
    ///
    /// The result is ready once [`conversion_done`](Self::conversion_done)
    /// returns true; fetch it with [`read_continuous`](Self::read_continuous).
    pub fn start_one_shot(&mut self) -> Result<(), SensorError> {
        self.write_config(CONFIG_SHUTDOWN_12BIT)?;
        self.write_config(CONFIG_ONESHOT_12BIT)
    }

    /// Whether the conversion started by
    /// [`start_one_shot`](Self::start_one_shot) has finished
    pub fn conversion_done(&mut self) -> Result<bool, SensorError> {
        Ok(self.read_config()? & CONFIG_OS == 0)
    }

    /// Convert a sign-extended 12-bit reading to 0.1°C
    ///
    /// Truncates toward zero. Readings outside -55..=125°C are rejected
    /// before conversion, so 125.0625°C does not pass as 125.0°C.
    pub fn raw_to_temp_x10(raw: i16) -> Result<i16, SensorError> {
        if !(MIN_RAW..=MAX_RAW).contains(&raw) {
            return Err(SensorError::OutOfRange);
        }

        // 0.0625°C per LSB
        Ok((raw as i32 * 10 / 16) as i16)
    }

    /// Give the bus and timing resources back
    pub fn release(self) -> (BUS, CLK, D) {
        (self.bus, self.clock, self.delay)
    }

    fn read_raw(&mut self) -> Result<i16, SensorError> {
        let mut data = [0u8; 2];
        self.bus
            .write_read(self.address, &[REG_TEMPERATURE], &mut data)
            .map_err(|_| SensorError::Bus)?;

        // Arithmetic shift keeps the sign of the left-justified 12-bit value
        Ok(i16::from_be_bytes(data) >> 4)
    }

    fn write_config(&mut self, value: u8) -> Result<(), SensorError> {
        self.bus
            .write(self.address, &[REG_CONFIG, value])
            .map_err(|_| SensorError::Bus)
    }

    fn read_config(&mut self) -> Result<u8, SensorError> {
        let mut config = [0u8; 1];
        self.bus
            .write_read(self.address, &[REG_CONFIG], &mut config)
            .map_err(|_| SensorError::Bus)?;
        Ok(config[0])
    }
}

impl<BUS, CLK, D> TemperatureSensor for Tmp100<BUS, CLK, D>
where
    BUS: I2cBus,
    CLK: Clock,
    D: DelayNs,
{
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        match self.mode {
            ConversionMode::Continuous => self.read_continuous(),
            ConversionMode::OneShot => self.read_one_shot(),
        }
    }
}
