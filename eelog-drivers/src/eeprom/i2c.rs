//! 24-series I2C serial EEPROM
//!
//! Parts such as the 24FC256 take a two-byte big-endian word address
//! followed by up to one page of data per write transaction. Random reads
//! set the address pointer with a write and read back with a repeated
//! start. While an internal write cycle runs the part does not
//! acknowledge its address, which is what [`poll_ready`] waits on.
//!
//! [`poll_ready`]: BlockTransport::poll_ready

use eelog_core::config::MAX_PAGE_SIZE;
use eelog_core::traits::{BlockTransport, TransportError};
use eelog_hal::{Clock, Deadline, I2cBus, I2cBusError};
use embedded_hal::delay::DelayNs;
use heapless::Vec;

/// 7-bit bus address with A2..A0 tied low
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Presence probe attempts before giving up
pub const PROBE_ATTEMPTS: u8 = 5;

/// Pause between presence probe attempts
pub const PROBE_RETRY_MS: u32 = 10;

/// Pause between ack polls while a write cycle runs
const ACK_POLL_INTERVAL_US: u32 = 100;

const ADDRESS_BYTES: usize = 2;
const FRAME_CAPACITY: usize = ADDRESS_BYTES + MAX_PAGE_SIZE;

fn transport_error(e: I2cBusError) -> TransportError {
    match e {
        I2cBusError::Nack => TransportError::Nack,
        I2cBusError::Timeout => TransportError::Timeout,
        _ => TransportError::Bus,
    }
}

/// Serial EEPROM behind an I2C bus
pub struct I2cEeprom<BUS, CLK, D> {
    bus: BUS,
    clock: CLK,
    delay: D,
    address: u8,
}

impl<BUS, CLK, D> I2cEeprom<BUS, CLK, D>
where
    BUS: I2cBus,
    CLK: Clock,
    D: DelayNs,
{
    /// Create a driver for a device at [`DEFAULT_ADDRESS`]
    pub fn new(bus: BUS, clock: CLK, delay: D) -> Self {
        Self::with_address(bus, clock, delay, DEFAULT_ADDRESS)
    }

    /// Create a driver for a device with its address pins strapped
    pub fn with_address(bus: BUS, clock: CLK, delay: D, address: u8) -> Self {
        Self {
            bus,
            clock,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus and timing resources back
    pub fn release(self) -> (BUS, CLK, D) {
        (self.bus, self.clock, self.delay)
    }
}

impl<BUS, CLK, D> BlockTransport for I2cEeprom<BUS, CLK, D>
where
    BUS: I2cBus,
    CLK: Clock,
    D: DelayNs,
{
    fn probe_presence(&mut self, timeout_ms: u32) -> bool {
        let deadline = Deadline::start(&self.clock, timeout_ms);

        for attempt in 1..=PROBE_ATTEMPTS {
            if self.bus.probe(self.address) {
                return true;
            }
            if attempt == PROBE_ATTEMPTS || deadline.expired(&self.clock) {
                break;
            }
            self.delay.delay_ms(PROBE_RETRY_MS);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("No EEPROM acknowledge at {=u8:#x}", self.address);
        false
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), TransportError> {
        let mut frame: Vec<u8, FRAME_CAPACITY> = Vec::new();
        frame
            .extend_from_slice(&address.to_be_bytes())
            .map_err(|_| TransportError::PayloadTooLarge)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| TransportError::PayloadTooLarge)?;

        self.bus
            .write(self.address, &frame)
            .map_err(transport_error)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), TransportError> {
        if buf.is_empty() {
            return Ok(());
        }

        self.bus
            .write_read(self.address, &address.to_be_bytes(), buf)
            .map_err(transport_error)
    }

    fn poll_ready(&mut self, timeout_ms: u32) -> Result<(), TransportError> {
        let deadline = Deadline::start(&self.clock, timeout_ms);

        loop {
            if self.bus.probe(self.address) {
                return Ok(());
            }
            if deadline.expired(&self.clock) {
                return Err(TransportError::Timeout);
            }
            self.delay.delay_us(ACK_POLL_INTERVAL_US);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingDelay, TickClock};
    use eelog_core::config::{BusTimings, DeviceGeometry, StorageConfig};
    use eelog_core::storage::StorageController;

    const SIZE: usize = 32_768;
    const PAGE: usize = 64;

    /// 24FC256 bus model
    ///
    /// Page writes roll over inside the addressed page, like the real
    /// part. After each data write the device NACKs `busy_polls` times.
    struct EepromBus {
        address: u8,
        present: bool,
        memory: [u8; SIZE],
        busy_polls: u32,
        busy_remaining: u32,
        probes: usize,
        /// (word address, payload length) of each data write
        frames: heapless::Vec<(u16, usize), 16>,
        fail_bus: bool,
    }

    impl EepromBus {
        fn new() -> Self {
            Self {
                address: DEFAULT_ADDRESS,
                present: true,
                memory: [0xFF; SIZE],
                busy_polls: 0,
                busy_remaining: 0,
                probes: 0,
                frames: heapless::Vec::new(),
                fail_bus: false,
            }
        }

        fn select(&mut self, address: u8) -> Result<(), I2cBusError> {
            if self.fail_bus {
                return Err(I2cBusError::ArbitrationLost);
            }
            if address != self.address || !self.present {
                return Err(I2cBusError::Nack);
            }
            if self.busy_remaining > 0 {
                self.busy_remaining -= 1;
                return Err(I2cBusError::Nack);
            }
            Ok(())
        }
    }

    impl I2cBus for EepromBus {
        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cBusError> {
            if data.is_empty() {
                self.probes += 1;
            }
            self.select(address)?;
            if data.len() <= ADDRESS_BYTES {
                return Ok(());
            }

            let word = u16::from_be_bytes([data[0], data[1]]) as usize % SIZE;
            let payload = &data[ADDRESS_BYTES..];
            let page_base = word - word % PAGE;
            for (i, &byte) in payload.iter().enumerate() {
                self.memory[page_base + (word % PAGE + i) % PAGE] = byte;
            }
            let _ = self.frames.push((word as u16, payload.len()));
            self.busy_remaining = self.busy_polls;
            Ok(())
        }

        fn read(&mut self, address: u8, _buf: &mut [u8]) -> Result<(), I2cBusError> {
            self.select(address)
        }

        fn write_read(
            &mut self,
            address: u8,
            write_data: &[u8],
            read_buf: &mut [u8],
        ) -> Result<(), I2cBusError> {
            self.select(address)?;
            let word = u16::from_be_bytes([write_data[0], write_data[1]]) as usize;
            for (i, byte) in read_buf.iter_mut().enumerate() {
                *byte = self.memory[(word + i) % SIZE];
            }
            Ok(())
        }
    }

    fn eeprom(bus: EepromBus) -> I2cEeprom<EepromBus, TickClock, RecordingDelay> {
        I2cEeprom::new(bus, TickClock::new(1), RecordingDelay::default())
    }

    #[test]
    fn test_write_frame_carries_big_endian_address() {
        let mut dev = eeprom(EepromBus::new());
        dev.write(0x0102, &[0xAA, 0xBB, 0xCC]).unwrap();

        let (bus, _, _) = dev.release();
        assert_eq!(&bus.frames[..], &[(0x0102, 3)]);
        assert_eq!(&bus.memory[0x0102..0x0105], &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_oversized_payload_rejected_without_traffic() {
        let mut dev = eeprom(EepromBus::new());
        let data = [0u8; MAX_PAGE_SIZE + 1];

        assert_eq!(dev.write(0, &data), Err(TransportError::PayloadTooLarge));
        let (bus, _, _) = dev.release();
        assert!(bus.frames.is_empty());
    }

    #[test]
    fn test_full_page_payload_fits() {
        let mut dev = eeprom(EepromBus::new());
        assert_eq!(dev.write(0, &[0u8; MAX_PAGE_SIZE]), Ok(()));
    }

    #[test]
    fn test_random_read() {
        let mut bus = EepromBus::new();
        bus.memory[0x7FFE] = 0x12;
        bus.memory[0x7FFF] = 0x34;
        let mut dev = eeprom(bus);

        let mut buf = [0u8; 2];
        dev.read(0x7FFE, &mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn test_absent_device_probes_five_times() {
        let mut bus = EepromBus::new();
        bus.present = false;
        let mut dev = eeprom(bus);

        assert!(!dev.probe_presence(1_000));
        let (bus, _, delay) = dev.release();
        assert_eq!(bus.probes, PROBE_ATTEMPTS as usize);
        assert_eq!(delay.total_ms, 4 * PROBE_RETRY_MS as u64);
    }

    #[test]
    fn test_probe_gives_up_at_timeout() {
        let mut bus = EepromBus::new();
        bus.present = false;
        let mut dev = eeprom(bus);

        // The clock advances 1 ms per read, so a zero budget allows one try
        assert!(!dev.probe_presence(0));
        let (bus, _, _) = dev.release();
        assert_eq!(bus.probes, 1);
    }

    #[test]
    fn test_probe_succeeds_after_busy_nacks() {
        let mut bus = EepromBus::new();
        bus.busy_remaining = 2;
        let mut dev = eeprom(bus);

        assert!(dev.probe_presence(1_000));
        let (bus, _, _) = dev.release();
        assert_eq!(bus.probes, 3);
    }

    #[test]
    fn test_poll_ready_waits_out_write_cycle() {
        let mut bus = EepromBus::new();
        bus.busy_polls = 3;
        let mut dev = eeprom(bus);

        dev.write(10, &[1]).unwrap();
        assert_eq!(dev.poll_ready(10), Ok(()));
        let (bus, _, delay) = dev.release();
        assert_eq!(bus.probes, 4);
        assert_eq!(delay.total_us, 3 * ACK_POLL_INTERVAL_US as u64);
    }

    #[test]
    fn test_poll_ready_times_out() {
        let mut bus = EepromBus::new();
        bus.busy_polls = u32::MAX;
        let mut dev = eeprom(bus);

        dev.write(10, &[1]).unwrap();
        assert_eq!(dev.poll_ready(10), Err(TransportError::Timeout));
    }

    #[test]
    fn test_bus_errors_are_classified() {
        let mut bus = EepromBus::new();
        bus.fail_bus = true;
        let mut dev = eeprom(bus);

        assert_eq!(dev.write(0, &[1]), Err(TransportError::Bus));
        assert_eq!(transport_error(I2cBusError::Nack), TransportError::Nack);
        assert_eq!(
            transport_error(I2cBusError::Timeout),
            TransportError::Timeout
        );
    }

    #[test]
    fn test_controller_over_i2c_never_rolls_over_a_page() {
        let mut bus = EepromBus::new();
        bus.busy_polls = 2;
        let config = StorageConfig::new(DeviceGeometry::M24FC256, BusTimings::with_ack_polling());
        let mut ctl = StorageController::new(eeprom(bus), RecordingDelay::default(), config);

        // Fresh chip: the erased record clamps to a full, wrapped log at data_start
        ctl.init().unwrap();
        assert_eq!(ctl.status().write_cursor, 6);

        let record: [u8; 100] = core::array::from_fn(|i| i as u8);
        ctl.write(&record).unwrap();
        ctl.seek(6).unwrap();

        let mut back = [0u8; 100];
        ctl.read(&mut back).unwrap();
        assert_eq!(back, record);
        assert_eq!(ctl.status().write_cursor, 106);

        let (dev, _) = ctl.release();
        let (bus, _, _) = dev.release();
        for &(word, len) in bus.frames.iter() {
            let word = word as usize;
            assert!(word % PAGE + len <= PAGE);
        }
    }
}
