//! USB HID transport abstraction and wire constants
//!
//! The deck enumerates as a vendor-defined HID device with one input report
//! and two vendor configuration feature reports:
//!
//! | ID | Kind    | Length | Content                                   |
//! |----|---------|--------|-------------------------------------------|
//! | 1  | Input   | 4      | buttons bitmap, slider 1, slider 2, slider 3 |
//! | 2  | Feature | 64     | button configuration (opaque)             |
//! | 3  | Feature | 64     | slider configuration (opaque)             |
//!
//! The interrupt-IN endpoint polls every 10 ms.

/// Input report ID (buttons + sliders).
pub const INPUT_REPORT_ID: u8 = 1;
/// Input report payload length, report ID excluded.
pub const INPUT_REPORT_LEN: usize = 4;
/// Feature report ID carrying vendor button configuration.
pub const BUTTON_CONFIG_REPORT_ID: u8 = 2;
/// Feature report ID carrying vendor slider configuration.
pub const SLIDER_CONFIG_REPORT_ID: u8 = 3;
/// Feature report payload length, report ID excluded.
pub const FEATURE_REPORT_LEN: usize = 64;
/// Interrupt-IN endpoint polling interval in milliseconds.
pub const ENDPOINT_POLL_INTERVAL_MS: u8 = 10;

/// HID report descriptor matching the report table above.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x06, 0x00, 0xFF, // Usage Page (Vendor 0xFF00)
    0x09, 0x01, //       Usage (Vendor 1)
    0xA1, 0x01, //       Collection (Application)
    // Report 1: 8 buttons, 1 bit each
    0x85, 0x01, //   Report ID (1)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (1)
    0x29, 0x08, //   Usage Maximum (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Var, Abs)
    // Report 1: 3 sliders, 0..=100
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x36, //   Usage (Slider)
    0x09, 0x36, //   Usage (Slider)
    0x09, 0x36, //   Usage (Slider)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x64, //   Logical Maximum (100)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x02, //   Input (Data, Var, Abs)
    // Report 2: button configuration
    0x85, 0x02, //   Report ID (2)
    0x06, 0x00, 0xFF, // Usage Page (Vendor)
    0x09, 0x10, //   Usage (Button Config)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x40, //   Report Count (64)
    0xB1, 0x02, //   Feature (Data, Var, Abs)
    // Report 3: slider configuration
    0x85, 0x03, //   Report ID (3)
    0x06, 0x00, 0xFF, // Usage Page (Vendor)
    0x09, 0x11, //   Usage (Slider Config)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x40, //   Report Count (64)
    0xB1, 0x02, //   Feature (Data, Var, Abs)
    0xC0, //         End Collection
];

/// Host-facing HID interrupt-IN endpoint.
///
/// `is_ready` reflects host backpressure: it is false until the host has
/// consumed the previously queued report.
pub trait HidTransport {
    /// True when a new report may be queued.
    fn is_ready(&self) -> bool;

    /// Queue one report. `payload` excludes the report ID byte.
    fn send_report(&mut self, report_id: u8, payload: &[u8]) -> Result<(), HidError>;
}

/// HID errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// Device not enumerated / configured by the host
    NotConfigured,
    /// Endpoint rejected the transfer
    Endpoint,
    /// Report ID not defined by the descriptor
    UnknownReport,
    /// Payload longer than the report
    InvalidLength,
}

#[cfg(feature = "std")]
impl std::error::Error for HidError {}

impl core::fmt::Display for HidError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "HID device not configured"),
            Self::Endpoint => write!(f, "HID endpoint error"),
            Self::UnknownReport => write!(f, "Unknown HID report ID"),
            Self::InvalidLength => write!(f, "HID payload length invalid"),
        }
    }
}
