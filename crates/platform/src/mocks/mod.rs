//! Mock implementations for testing
//!
//! This module provides instrumented fakes of all platform traits for use in
//! unit and integration tests. Fakes that the code under test takes by value
//! are implemented for `&Mock`, so a test keeps its own handle for
//! inspection while the pipeline owns the reference.

#![cfg(any(test, feature = "std"))]

use crate::*;
use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicUsize, Ordering};

/// FNV-1a over a pixel payload, used to compare transfers without storing
/// whole bands.
pub fn fingerprint(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811C_9DC5u32, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(0x0100_0193)
    })
}

/// One `start_transfer` call as seen by [`MockDisplayTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    /// Target rectangle
    pub area: Area,
    /// Payload length in bytes
    pub len: usize,
    /// FNV-1a of the payload at start time
    pub fingerprint: u32,
    /// Address of the payload, identifies the pool buffer
    pub addr: usize,
    /// First two bytes (first pixel), if any
    pub first_pixel: Option<[u8; 2]>,
}

/// Instrumented display transport.
///
/// Transfers stay outstanding until the test calls
/// [`complete_oldest`](Self::complete_oldest), which plays the role of the
/// hardware finishing the DMA.
pub struct MockDisplayTransport {
    transfers: RefCell<heapless::Vec<TransferRecord, 256>>,
    outstanding: RefCell<heapless::Deque<TransferRecord, 4>>,
    overlapping_starts: Cell<usize>,
    fail_next: Cell<Option<DisplayError>>,
}

impl MockDisplayTransport {
    /// Create new mock transport
    pub fn new() -> Self {
        Self {
            transfers: RefCell::new(heapless::Vec::new()),
            outstanding: RefCell::new(heapless::Deque::new()),
            overlapping_starts: Cell::new(0),
            fail_next: Cell::new(None),
        }
    }

    /// Make the next `start_transfer` fail with `err`.
    pub fn fail_next(&self, err: DisplayError) {
        self.fail_next.set(Some(err));
    }

    /// Every transfer started so far.
    pub fn transfers(&self) -> heapless::Vec<TransferRecord, 256> {
        self.transfers.borrow().clone()
    }

    /// Number of transfers started so far.
    pub fn transfer_count(&self) -> usize {
        self.transfers.borrow().len()
    }

    /// Transfers started but not yet completed.
    pub fn outstanding_count(&self) -> usize {
        self.outstanding.borrow().len()
    }

    /// True when the buffer at `addr` is currently owned by the "hardware".
    pub fn is_outstanding(&self, addr: usize) -> bool {
        self.outstanding.borrow().iter().any(|t| t.addr == addr)
    }

    /// Starts issued while an earlier transfer was still outstanding.
    pub fn overlapping_starts(&self) -> usize {
        self.overlapping_starts.get()
    }

    /// Finish the oldest outstanding transfer.
    pub fn complete_oldest(&self) -> Option<TransferRecord> {
        self.outstanding.borrow_mut().pop_front()
    }
}

impl Default for MockDisplayTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayTransport for &MockDisplayTransport {
    async fn start_transfer(&mut self, area: Area, pixels: &[u8]) -> Result<(), DisplayError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        if pixels.len() != area.byte_len() {
            return Err(DisplayError::InvalidBuffer);
        }
        let record = TransferRecord {
            area,
            len: pixels.len(),
            fingerprint: fingerprint(pixels),
            addr: pixels.as_ptr() as usize,
            first_pixel: match pixels {
                [a, b, ..] => Some([*a, *b]),
                _ => None,
            },
        };
        if !self.outstanding.borrow().is_empty() {
            self.overlapping_starts
                .set(self.overlapping_starts.get().saturating_add(1));
        }
        let _ = self.transfers.borrow_mut().push(record);
        let _ = self.outstanding.borrow_mut().push_back(record);
        Ok(())
    }
}

/// Counts flush acknowledgments forwarded to the transport.
#[derive(Default)]
pub struct MockFlushAck {
    acks: AtomicUsize,
}

impl MockFlushAck {
    /// Create new ack counter
    pub const fn new() -> Self {
        Self {
            acks: AtomicUsize::new(0),
        }
    }

    /// Acknowledgments received
    pub fn count(&self) -> usize {
        self.acks.load(Ordering::Acquire)
    }
}

impl FlushAck for MockFlushAck {
    fn flush_ready(&self) {
        self.acks.fetch_add(1, Ordering::AcqRel);
    }
}

impl FlushAck for &MockFlushAck {
    fn flush_ready(&self) {
        (**self).flush_ready();
    }
}

/// Mock touch sensor
///
/// Returns queued results in order; once the queue is empty the last
/// successful sample repeats, like a sensor whose buffer is not refreshed.
pub struct MockTouch {
    samples: heapless::Deque<Result<RawTouchSample, TouchError>, 32>,
    last: RawTouchSample,
    reads: usize,
}

impl MockTouch {
    /// Create new mock touch sensor
    pub fn new() -> Self {
        Self {
            samples: heapless::Deque::new(),
            last: RawTouchSample::released(),
            reads: 0,
        }
    }

    /// Queue one sample
    pub fn push(&mut self, sample: RawTouchSample) -> Result<(), RawTouchSample> {
        self.samples.push_back(Ok(sample)).map_err(|_| sample)
    }

    /// Queue one failed read
    pub fn push_error(&mut self, err: TouchError) -> Result<(), TouchError> {
        self.samples.push_back(Err(err)).map_err(|_| err)
    }

    /// Number of reads performed
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Default for MockTouch {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchSensor for MockTouch {
    async fn read(&mut self) -> Result<RawTouchSample, TouchError> {
        self.reads = self.reads.saturating_add(1);
        match self.samples.pop_front() {
            Some(Ok(sample)) => {
                self.last = sample;
                Ok(sample)
            }
            Some(Err(err)) => Err(err),
            None => Ok(self.last),
        }
    }
}

/// Mock HID interrupt-IN endpoint
///
/// Records every `send_report` call, including ones made while not ready,
/// so tests can assert on backpressure discipline.
pub struct MockHid {
    ready: bool,
    host_consumes: bool,
    send_calls: usize,
    sent: heapless::Vec<(u8, heapless::Vec<u8, 64>), 128>,
}

impl MockHid {
    /// Endpoint that is always ready
    pub fn new() -> Self {
        Self {
            ready: true,
            host_consumes: true,
            send_calls: 0,
            sent: heapless::Vec::new(),
        }
    }

    /// Endpoint whose host never consumes reports
    pub fn stalled() -> Self {
        Self {
            ready: false,
            host_consumes: false,
            ..Self::new()
        }
    }

    /// Endpoint that goes busy after each send until [`Self::host_poll`]
    pub fn polled() -> Self {
        Self {
            host_consumes: false,
            ..Self::new()
        }
    }

    /// Simulate the host reading the queued report
    pub fn host_poll(&mut self) {
        self.ready = true;
    }

    /// Force readiness
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Calls to `send_report`, successful or not
    pub fn send_calls(&self) -> usize {
        self.send_calls
    }

    /// Reports accepted by the endpoint
    pub fn sent(&self) -> &[(u8, heapless::Vec<u8, 64>)] {
        &self.sent
    }
}

impl Default for MockHid {
    fn default() -> Self {
        Self::new()
    }
}

impl HidTransport for MockHid {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn send_report(&mut self, report_id: u8, payload: &[u8]) -> Result<(), HidError> {
        self.send_calls = self.send_calls.saturating_add(1);
        if !self.ready {
            return Err(HidError::Endpoint);
        }
        let bytes = heapless::Vec::from_slice(payload).map_err(|_| HidError::InvalidLength)?;
        let _ = self.sent.push((report_id, bytes));
        if !self.host_consumes {
            self.ready = false;
        }
        Ok(())
    }
}
