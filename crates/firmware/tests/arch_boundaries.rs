//! Architecture boundary tests. Run with `cargo test -p firmware --test arch_boundaries`
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Layering rules:
//!   Rule 1: `platform` (traits, wire constants, config) depends on nothing local
//!   Rule 2: `ui` depends on `platform` only, never on `firmware`
//!   Rule 3: concrete drivers in `firmware` plug in through `platform` traits
//!   Rule 4: state shared with the completion context is `Sync`
//!
//! Rules 1 and 2 are enforced by the Cargo dependency graph: a cycle would
//! stop this test binary from linking. The tests below pin the trait seams
//! at compile time.

use embedded_hal_mock::eh1::digital::Mock as PinMock;
use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
use embedded_hal_mock::eh1::spi::Mock as SpiMock;
use firmware::display::St7796;
use firmware::{FlushCompletion, Gt911, InputState, TickClock};
use platform::mocks::MockFlushAck;
use platform::{CompletionNotify, DisplayTransport, FlushAck, HidTransport, TouchSensor};

fn assert_display<T: DisplayTransport>() {}
fn assert_touch<T: TouchSensor>() {}
fn assert_notify<T: CompletionNotify>() {}
fn assert_ack<T: FlushAck>() {}
fn assert_hid<T: HidTransport>() {}
fn assert_sync<T: Sync>() {}
fn assert_error<E: std::error::Error>() {}

#[test]
fn drivers_implement_platform_traits() {
    assert_display::<St7796<SpiMock<u8>, PinMock, &'static FlushCompletion>>();
    assert_touch::<Gt911<I2cMock>>();
    assert_hid::<platform::mocks::MockHid>();
}

#[test]
fn completion_bridges_transport_to_pipeline() {
    assert_notify::<FlushCompletion>();
    assert_notify::<&FlushCompletion<MockFlushAck>>();
    assert_ack::<()>();
    assert_ack::<MockFlushAck>();
}

#[test]
fn shared_state_is_sync() {
    assert_sync::<FlushCompletion>();
    assert_sync::<InputState>();
    assert_sync::<TickClock>();
}

/// `ui` builds and runs without any firmware type in scope.
#[test]
fn ui_is_driver_free() {
    let mut ui = ui::DeckUi::new(480, 320);
    assert!(!ui.take_dirty().is_empty());
    assert!(ui.dirty().is_clean());
}

/// Statics are how the target shares these; they must be const-constructible.
#[test]
fn shared_state_is_const_constructible() {
    static STATE: InputState = InputState::new();
    static CLOCK: TickClock = TickClock::new();
    static DONE: FlushCompletion = FlushCompletion::new();
    assert_eq!(STATE.snapshot().buttons, 0);
    assert_eq!(CLOCK.ticks(), 0);
    assert!(!DONE.is_busy());
}

/// Host builds enable `platform/std`; its errors box into `std::error::Error`.
#[test]
fn platform_errors_are_std_errors_on_host() {
    assert_error::<platform::DisplayError>();
    assert_error::<platform::TouchError>();
    assert_error::<platform::HidError>();
    assert_error::<platform::ConfigError>();
    assert_error::<platform::OutOfRangeError>();
    let err: Box<dyn std::error::Error> = Box::new(platform::TouchError::Bus);
    assert!(!err.to_string().is_empty());
}
