//! Hardware Abstraction Layer (HAL) for the touch deck
//!
//! This crate provides the collaborator traits and the shared data model of
//! the deck, so the real-time core in `firmware` can be developed and tested
//! without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: flush pipeline, mapper, encoder, ticks)
//!         ↓
//! Feature Layer (ui crate: deck widgets, dirty tracking)
//!         ↓
//! Platform HAL (this crate - traits, data model, wire constants)
//!         ↓
//! Hardware Layer (SPI panel, I²C touch sensor, USB HID endpoint)
//! ```
//!
//! # Collaborators
//!
//! - [`DisplayTransport`] - hands `(area, pixel bytes)` to the panel controller
//! - [`FlushAck`] - forward path telling the transport the driver is ready
//! - [`CompletionNotify`] - hardware-completion callback sink
//! - [`TouchSensor`] - raw single-contact touch samples
//! - [`HidTransport`] - interrupt-IN endpoint with a readiness signal
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `defmt`: Enable defmt formatting on all types
//! - `serde`: Serialize/Deserialize on startup configuration
//!
//! # Example
//!
//! ```no_run
//! use platform::{Area, DisplayTransport};
//!
//! async fn example<T: DisplayTransport>(panel: &mut T, band: &[u8]) {
//!     let area = Area::new(0, 0, 479, 29).unwrap();
//!     panel.start_transfer(area, band).await.unwrap();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod config;
pub mod display;
pub mod hid;
pub mod input;
pub mod orientation;
pub mod touch;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use config::{Buffering, ConfigError, DeckConfig};
pub use display::{Area, CompletionNotify, DisplayError, DisplayTransport, FlushAck};
pub use hid::{
    HidError, HidTransport, BUTTON_CONFIG_REPORT_ID, ENDPOINT_POLL_INTERVAL_MS, FEATURE_REPORT_LEN,
    INPUT_REPORT_ID, INPUT_REPORT_LEN, REPORT_DESCRIPTOR, SLIDER_CONFIG_REPORT_ID,
};
pub use input::{ButtonId, OutOfRangeError, SliderId, SliderValue, BUTTON_COUNT, SLIDER_COUNT};
pub use orientation::{AxisTransform, Orientation, OrientationTransform};
pub use touch::{LogicalPoint, RawTouchSample, TouchError, TouchSensor, TouchState};
