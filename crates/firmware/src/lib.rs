//! Touch Deck Firmware
//!
//! Real-time core of a 480×320 touchscreen USB-HID control deck: eight
//! buttons and three sliders drawn on an ST7796 panel, driven by a GT911
//! touch controller and reported to the host as a 4-byte HID input report.
//!
//! # Architecture
//!
//! ```text
//!  TickScheduler ──▶ DeckWorker ──▶ render_dirty ──▶ FlushPipeline ──▶ St7796
//!                      │  ▲                              ▲                │
//!                      │  └─ CoordinateMapper ◀─ Gt911   └── FlushCompletion ◀┘
//!                      ▼                                   (completion context)
//!                  InputState ──▶ InputReportEncoder ──▶ HID endpoint
//!                                    ▲
//!  TickScheduler ──▶ report_loop ────┘
//! ```
//!
//! # Features
//!
//! - `hardware` - Target build: defmt logging and the 32.768 kHz tick rate
//! - `defmt` - defmt formatting for every public type
//! - `std` - Host builds; logging through `tracing`

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

#[macro_use]
mod fmt;

pub mod app;
pub mod display;
pub mod hid;
pub mod render;
pub mod tick;
pub mod touch;

// Re-export key types
pub use app::{report_loop, run_deck, DeckWorker, StepOutcome};
pub use display::{
    BandTarget, BufferId, BufferState, DirtyRegion, DisplayHealth, FlushCompletion, FlushError,
    FlushPipeline, FrameBufferPool, St7796, BAND_BUFFER_SIZE, BAND_HEIGHT, DISPLAY_HEIGHT,
    DISPLAY_WIDTH,
};
pub use hid::{
    build_report, FeatureReports, InputReport, InputReportEncoder, InputSnapshot, InputState,
    ReportError, ReportOutcome,
};
pub use render::{render_dirty, DeckScene};
pub use tick::{Tick, TickClock, TickScheduler};
pub use touch::{CoordinateMapper, Gt911};
