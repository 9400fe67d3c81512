//! Property tests for the circular log controller
//!
//! Runs the controller against a RAM-backed device and checks the
//! cursor, chunking and capacity invariants over random write sequences.

use eelog_core::config::{BusTimings, DeviceGeometry, StorageConfig};
use eelog_core::storage::metadata::{persist, restore, LogMetadata};
use eelog_core::storage::{chunk_len, StorageController};
use eelog_core::traits::{BlockTransport, TransportError};
use embedded_hal::delay::DelayNs;
use proptest::prelude::*;

const TOTAL: usize = 32_768;
const PAGE: u16 = 64;
const DATA_START: u16 = 5;

struct RamDevice {
    memory: Vec<u8>,
    writes: Vec<(u16, usize)>,
}

impl RamDevice {
    fn with_cursor(write_cursor: u16, used_size: u16) -> Self {
        let mut memory = vec![0xFF; TOTAL];
        memory[..2].copy_from_slice(&write_cursor.to_be_bytes());
        memory[2..4].copy_from_slice(&used_size.to_be_bytes());
        memory[4] = 0;
        Self {
            memory,
            writes: Vec::new(),
        }
    }
}

impl BlockTransport for RamDevice {
    fn probe_presence(&mut self, _timeout_ms: u32) -> bool {
        true
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), TransportError> {
        self.writes.push((address, data.len()));
        let start = address as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), TransportError> {
        let start = address as usize;
        buf.copy_from_slice(&self.memory[start..start + buf.len()]);
        Ok(())
    }

    fn poll_ready(&mut self, _timeout_ms: u32) -> Result<(), TransportError> {
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn config() -> StorageConfig {
    StorageConfig::new(
        DeviceGeometry::new(TOTAL as u32, PAGE, 0, 5, DATA_START).unwrap(),
        BusTimings::default(),
    )
}

fn open(device: RamDevice) -> StorageController<RamDevice, NoDelay> {
    let mut ctl = StorageController::new(device, NoDelay, config());
    ctl.init().unwrap();
    ctl
}

proptest! {
    #[test]
    fn cursor_tracks_bytes_written_before_wrap(
        sizes in prop::collection::vec(1usize..300, 1..40)
    ) {
        let mut ctl = open(RamDevice::with_cursor(DATA_START, 0));
        let mut total = 0usize;

        for size in sizes {
            ctl.write(&vec![0xA5; size]).unwrap();
            total += size;
        }

        let status = ctl.status();
        prop_assert_eq!(status.write_cursor as usize, DATA_START as usize + total);
        prop_assert_eq!(status.used_size as usize, total);
        prop_assert!(!status.has_wrapped);
    }

    #[test]
    fn no_write_spans_two_pages(
        start in DATA_START..(TOTAL as u16),
        sizes in prop::collection::vec(1usize..600, 1..10)
    ) {
        let mut ctl = open(RamDevice::with_cursor(start, 0));

        for size in sizes {
            ctl.write(&vec![0x3C; size]).unwrap();
        }

        let (device, _) = ctl.release();
        for (address, len) in device.writes {
            let first = address as usize / PAGE as usize;
            let last = (address as usize + len - 1) / PAGE as usize;
            prop_assert_eq!(first, last, "write at {} len {} spans pages", address, len);
        }
    }

    #[test]
    fn cursor_stays_in_data_region_and_used_is_capped(
        start in DATA_START..(TOTAL as u16),
        used in 0u16..32_763,
        sizes in prop::collection::vec(1usize..4_000, 1..20)
    ) {
        let mut ctl = open(RamDevice::with_cursor(start, used));
        let capacity = ctl.geometry().usable_size();
        let mut was_full = false;

        for size in sizes {
            let before = ctl.status().write_cursor as usize;
            ctl.write(&vec![0x11; size]).unwrap();
            let status = ctl.status();

            prop_assert!(ctl.geometry().in_data_region(status.write_cursor as u32));
            prop_assert!(status.used_size as u32 <= capacity);
            if before + size >= TOTAL {
                prop_assert!(status.has_wrapped);
            }
            if was_full {
                prop_assert_eq!(status.used_size as u32, capacity);
                prop_assert!(status.has_wrapped);
            }
            was_full = status.used_size as u32 == capacity;
        }
    }

    #[test]
    fn next_write_after_reaching_end_starts_at_data_start(
        tail in 1usize..64,
        size in 1usize..200
    ) {
        let start = (TOTAL - tail) as u16;
        let mut ctl = open(RamDevice::with_cursor(start, 0));

        ctl.write(&vec![0u8; tail]).unwrap();
        let (mut device, delay) = ctl.release();
        device.writes.clear();
        let mut ctl = StorageController::new(device, delay, config());
        ctl.init().unwrap();

        ctl.write(&vec![1u8; size]).unwrap();
        prop_assert!(ctl.status().has_wrapped);

        let (device, _) = ctl.release();
        prop_assert_eq!(device.writes[0].0, DATA_START);
    }

    #[test]
    fn metadata_survives_persist_and_restore(
        write_cursor in any::<u16>(),
        used_size in any::<u16>(),
        has_wrapped in any::<bool>()
    ) {
        let mut device = RamDevice::with_cursor(0, 0);
        let geometry = DeviceGeometry::M24FC256;
        let meta = LogMetadata { write_cursor, used_size, has_wrapped };

        persist(&mut device, &mut NoDelay, &geometry, &BusTimings::default(), &meta).unwrap();
        prop_assert_eq!(restore(&mut device, &geometry).unwrap(), meta);
    }

    #[test]
    fn chunk_never_exceeds_room_in_page(
        address in 0u32..65_536,
        remaining in 1usize..10_000,
        page in prop::sample::select(vec![8u16, 16, 32, 64, 128, 256])
    ) {
        let len = chunk_len(address, remaining, page);
        prop_assert!(len >= 1);
        prop_assert!(len <= remaining);
        prop_assert!(address as usize % page as usize + len <= page as usize);
    }
}
