//! Input report packing and backpressure-aware sending.
//!
//! Wire layout (report ID 1, 4 bytes):
//!
//! | Byte | Content |
//! |------|---------|
//! | 0 | buttons 1–8, bit 0 = button 1 |
//! | 1 | slider 1 (0–100) |
//! | 2 | slider 2 (0–100) |
//! | 3 | slider 3 (0–100) |
//!
//! Nothing is queued. If the host has not consumed the previous report the
//! tick's send is skipped and the next due tick packs fresh state, so at most
//! one report is ever outstanding and it is always the newest.

use platform::{HidError, HidTransport, INPUT_REPORT_ID, INPUT_REPORT_LEN};

use super::state::{InputSnapshot, InputState};
use crate::tick::Tick;

/// One packed input report, without the report ID byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputReport([u8; INPUT_REPORT_LEN]);

impl InputReport {
    /// Payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Button bitmap.
    pub fn buttons(&self) -> u8 {
        let [buttons, ..] = self.0;
        buttons
    }
}

/// Pack a snapshot into the wire layout.
pub fn build_report(snapshot: &InputSnapshot) -> InputReport {
    let [a, b, c] = snapshot.sliders;
    InputReport([snapshot.buttons, a.get(), b.get(), c.get()])
}

impl From<&InputSnapshot> for InputReport {
    fn from(snapshot: &InputSnapshot) -> Self {
        build_report(snapshot)
    }
}

/// Report send errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Host has not consumed the previous report
    NotReady,
    /// Endpoint refused the report
    Transport(HidError),
}

#[cfg(feature = "std")]
impl std::error::Error for ReportError {}

impl core::fmt::Display for ReportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotReady => write!(f, "HID endpoint not ready"),
            Self::Transport(e) => write!(f, "HID transport error: {e}"),
        }
    }
}

impl From<HidError> for ReportError {
    fn from(e: HidError) -> Self {
        Self::Transport(e)
    }
}

/// What one tick did with the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportOutcome {
    /// Report queued on the endpoint
    Sent,
    /// Not a reporting tick, or this tick was already handled
    NotDue,
    /// Host busy; skipped until the next due tick
    NotReady,
    /// Endpoint error; skipped until the next due tick
    Failed,
}

/// Sends the input report every `interval` ticks, host permitting.
pub struct InputReportEncoder {
    interval: u32,
    last_seq: Option<u32>,
    sent: u32,
    not_ready: u32,
    failed: u32,
}

impl InputReportEncoder {
    /// Encoder reporting every `interval_ticks` ticks (zero is treated as one).
    pub fn new(interval_ticks: u32) -> Self {
        Self {
            interval: interval_ticks.max(1),
            last_seq: None,
            sent: 0,
            not_ready: 0,
            failed: 0,
        }
    }

    /// Send `report` if the endpoint is ready.
    ///
    /// Never calls `send_report` on a busy endpoint.
    pub fn try_send<T: HidTransport>(
        &mut self,
        report: &InputReport,
        transport: &mut T,
    ) -> Result<(), ReportError> {
        if !transport.is_ready() {
            self.not_ready = self.not_ready.saturating_add(1);
            return Err(ReportError::NotReady);
        }
        match transport.send_report(INPUT_REPORT_ID, report.as_bytes()) {
            Ok(()) => {
                self.sent = self.sent.saturating_add(1);
                Ok(())
            }
            Err(e) => {
                self.failed = self.failed.saturating_add(1);
                Err(e.into())
            }
        }
    }

    /// Handle one tick: at most one send attempt per tick sequence number.
    pub fn on_tick<T: HidTransport>(
        &mut self,
        tick: Tick,
        state: &InputState,
        transport: &mut T,
    ) -> ReportOutcome {
        if self.last_seq == Some(tick.seq) || tick.seq.checked_rem(self.interval) != Some(0) {
            return ReportOutcome::NotDue;
        }
        self.last_seq = Some(tick.seq);

        let report = build_report(&state.snapshot());
        match self.try_send(&report, transport) {
            Ok(()) => ReportOutcome::Sent,
            Err(ReportError::NotReady) => {
                trace!("report skipped at tick {}: host not ready", tick.seq);
                ReportOutcome::NotReady
            }
            Err(ReportError::Transport(e)) => {
                warn!("report send failed: {}", e);
                ReportOutcome::Failed
            }
        }
    }

    /// Reports queued.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Attempts skipped because the host was busy.
    pub fn not_ready(&self) -> u32 {
        self.not_ready
    }

    /// Attempts the endpoint refused.
    pub fn failed(&self) -> u32 {
        self.failed
    }
}
