//! USB HID side of the deck.
//!
//! - [`InputState`]: lock-free button/slider state shared by the UI and the
//!   report path
//! - [`InputReportEncoder`]: packs a snapshot into the 4-byte input report and
//!   sends it when the host endpoint is ready
//! - [`FeatureReports`]: vendor configuration blobs (IDs 2 and 3), stored and
//!   returned verbatim

pub mod encoder;
pub mod feature;
pub mod state;

pub use encoder::{build_report, InputReport, InputReportEncoder, ReportError, ReportOutcome};
pub use feature::FeatureReports;
pub use state::{InputSnapshot, InputState};
