//! In-memory block transport for unit tests

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::traits::{BlockTransport, TransportError};

pub(crate) const MOCK_SIZE: usize = 32_768;

/// RAM-backed device with a transaction log and failure injection
pub(crate) struct MockTransport {
    pub memory: [u8; MOCK_SIZE],
    pub present: bool,
    /// (address, length) of each write transaction
    pub writes: Vec<(u16, usize), 1024>,
    pub write_calls: usize,
    pub read_calls: usize,
    pub poll_calls: usize,
    pub probe_calls: usize,
    /// Index of the write call that fails with `Bus`
    pub fail_write_call: Option<usize>,
    /// Fail every write from this call index onward
    pub fail_writes_from: Option<usize>,
    pub fail_reads: bool,
    pub poll_times_out: bool,
}

impl MockTransport {
    /// A present, freshly erased device
    pub fn new() -> Self {
        Self {
            memory: [0xFF; MOCK_SIZE],
            present: true,
            writes: Vec::new(),
            write_calls: 0,
            read_calls: 0,
            poll_calls: 0,
            probe_calls: 0,
            fail_write_call: None,
            fail_writes_from: None,
            fail_reads: false,
            poll_times_out: false,
        }
    }

    /// A device whose head holds `record`
    pub fn with_record(record: &[u8]) -> Self {
        let mut mock = Self::new();
        mock.memory[..record.len()].copy_from_slice(record);
        mock
    }

    pub fn transactions(&self) -> usize {
        self.write_calls + self.read_calls
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.write_calls = 0;
        self.read_calls = 0;
        self.poll_calls = 0;
    }
}

impl BlockTransport for MockTransport {
    fn probe_presence(&mut self, _timeout_ms: u32) -> bool {
        self.probe_calls += 1;
        self.present
    }

    fn write(&mut self, address: u16, data: &[u8]) -> Result<(), TransportError> {
        let call = self.write_calls;
        self.write_calls += 1;

        if self.fail_write_call == Some(call) || self.fail_writes_from.is_some_and(|n| call >= n) {
            return Err(TransportError::Bus);
        }

        let _ = self.writes.push((address, data.len()));
        for (i, &byte) in data.iter().enumerate() {
            self.memory[(address as usize + i) % MOCK_SIZE] = byte;
        }
        Ok(())
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), TransportError> {
        self.read_calls += 1;

        if self.fail_reads {
            return Err(TransportError::Bus);
        }

        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.memory[(address as usize + i) % MOCK_SIZE];
        }
        Ok(())
    }

    fn poll_ready(&mut self, _timeout_ms: u32) -> Result<(), TransportError> {
        self.poll_calls += 1;
        if self.poll_times_out {
            Err(TransportError::Timeout)
        } else {
            Ok(())
        }
    }
}

/// Delay that only records how long it was asked to wait
#[derive(Default)]
pub(crate) struct MockDelay {
    pub total_ms: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}
