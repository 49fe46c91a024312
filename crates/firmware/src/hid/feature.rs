//! Feature report pass-through.
//!
//! Report IDs 2 (button configuration) and 3 (slider configuration) carry
//! 64-byte vendor blobs. The device stores whatever the host sets and hands
//! it back on request without interpreting it. A GET_REPORT for ID 1 returns
//! the live input report.

use platform::{
    HidError, BUTTON_CONFIG_REPORT_ID, FEATURE_REPORT_LEN, INPUT_REPORT_ID, SLIDER_CONFIG_REPORT_ID,
};

use super::encoder::build_report;
use super::state::InputState;

type Blob = [u8; FEATURE_REPORT_LEN];

/// Stored vendor configuration blobs.
pub struct FeatureReports {
    button_config: Blob,
    slider_config: Blob,
}

impl FeatureReports {
    /// Both blobs zeroed.
    pub const fn new() -> Self {
        Self {
            button_config: [0; FEATURE_REPORT_LEN],
            slider_config: [0; FEATURE_REPORT_LEN],
        }
    }

    /// Stored blob for a feature report ID.
    pub fn report(&self, id: u8) -> Option<&Blob> {
        match id {
            BUTTON_CONFIG_REPORT_ID => Some(&self.button_config),
            SLIDER_CONFIG_REPORT_ID => Some(&self.slider_config),
            _ => None,
        }
    }

    /// Host SET_REPORT. Short payloads are zero-padded.
    pub fn set_report(&mut self, id: u8, data: &[u8]) -> Result<(), HidError> {
        let slot = match id {
            BUTTON_CONFIG_REPORT_ID => &mut self.button_config,
            SLIDER_CONFIG_REPORT_ID => &mut self.slider_config,
            _ => return Err(HidError::UnknownReport),
        };
        let mut blob = [0u8; FEATURE_REPORT_LEN];
        blob.get_mut(..data.len())
            .ok_or(HidError::InvalidLength)?
            .copy_from_slice(data);
        *slot = blob;
        debug!("feature report {} set, {} bytes", id, data.len());
        Ok(())
    }

    /// Host GET_REPORT. Returns the number of bytes written to `out`.
    pub fn get_report(&self, id: u8, state: &InputState, out: &mut [u8]) -> Result<usize, HidError> {
        let input;
        let src: &[u8] = if id == INPUT_REPORT_ID {
            input = build_report(&state.snapshot());
            input.as_bytes()
        } else {
            self.report(id).ok_or(HidError::UnknownReport)?.as_slice()
        };
        out.get_mut(..src.len())
            .ok_or(HidError::InvalidLength)?
            .copy_from_slice(src);
        Ok(src.len())
    }
}

impl Default for FeatureReports {
    fn default() -> Self {
        Self::new()
    }
}
