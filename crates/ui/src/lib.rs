//! Deck UI layer: widget state, layout geometry, dirty-region tracking.
//!
//! The UI state is an ordinary value ([`DeckUi`]) owned by whoever drives
//! the render loop and passed by reference to event handlers; there is no
//! process-wide context. Drawing lives in `firmware::render`.
//!
//! This crate is `no_std` by default; it only uses `core`, `heapless` and
//! `embedded-graphics` geometry.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod deck;
pub mod dirty;
pub mod layout;

pub use deck::{ButtonWidget, DeckUi, SliderWidget, UiEvent, WidgetId};
pub use dirty::DirtyTracker;
pub use layout::{DeckLayout, SliderGeometry};
