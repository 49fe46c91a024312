//! End-to-end render and worker tests: dirty rectangles → bands → transport,
//! touch → UI → input state.
//!
//! Run with: cargo test -p firmware --test render_pass
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::arithmetic_side_effects
)]

use core::cell::Cell;

use embassy_futures::join::join;
use embassy_time::{Duration, Timer};
use firmware::{
    build_report, render_dirty, CoordinateMapper, DeckWorker, FlushCompletion, FlushPipeline, InputState, Tick,
    BAND_BUFFER_SIZE,
};
use platform::mocks::{MockDisplayTransport, MockTouch};
use platform::{
    Area, ButtonId, DeckConfig, FlushAck, RawTouchSample, SliderId, SliderValue, TouchError,
};
use ui::{DeckUi, UiEvent};

const TIMEOUT: Duration = Duration::from_millis(200);

async fn hardware<A: FlushAck>(mock: &MockDisplayTransport, done: &FlushCompletion<A>, stop: &Cell<bool>) {
    while !stop.get() {
        Timer::after_millis(1).await;
        if mock.complete_oldest().is_some() {
            done.on_hardware_complete();
        }
    }
}

/// Route `tracing` output through the test harness (`--features std`).
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tick(seq: u32) -> Tick {
    Tick { seq, skipped: 0 }
}

/// Raw GT911 sample that lands on logical `(x, y)` in the default
/// (inverted landscape) orientation.
fn raw_for(x: i32, y: i32) -> RawTouchSample {
    RawTouchSample::pressed(480 - x as u16, y as u16)
}

#[tokio::test]
async fn first_pass_paints_whole_screen_in_bands() {
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let stop = Cell::new(false);
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let mut pipe = FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, TIMEOUT).unwrap();
    let mut ui = DeckUi::new(480, 320);

    let render = async {
        let n = render_dirty(&mut ui, &mut pipe).await.unwrap();
        pipe.flush().await.unwrap();
        stop.set(true);
        n
    };
    let (regions, ()) = join(render, hardware(&mock, &done, &stop)).await;

    // 320 rows in 30-row bands: ten full bands and one of 20 rows.
    assert_eq!(regions, 11);
    let transfers = mock.transfers();
    assert_eq!(transfers.len(), 11);
    let mut next_row = 0;
    for t in &transfers {
        assert_eq!((t.area.x1, t.area.x2), (0, 479));
        assert_eq!(t.area.y1, next_row);
        next_row = t.area.y2 + 1;
    }
    assert_eq!(next_row, 320);
    assert_eq!(transfers.last().unwrap().area.height(), 20);
    assert!(ui.dirty().is_clean());
}

#[tokio::test]
async fn button_press_repaints_only_that_button() {
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let stop = Cell::new(false);
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let mut pipe = FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, TIMEOUT).unwrap();
    let mut ui = DeckUi::new(480, 320);
    let _ = ui.take_dirty();

    let target = ui.layout().button(ButtonId::new(5).unwrap());
    let centre = target.center();
    let event = ui.handle_pointer(CoordinateMapper::map(
        raw_for(centre.x, centre.y),
        platform::Orientation::InvertedLandscape,
        (480, 320),
    ));
    assert_eq!(event, Some(UiEvent::ButtonPressed(ButtonId::new(5).unwrap())));

    let render = async {
        let n = render_dirty(&mut ui, &mut pipe).await.unwrap();
        pipe.flush().await.unwrap();
        stop.set(true);
        n
    };
    let (regions, ()) = join(render, hardware(&mock, &done, &stop)).await;

    assert_eq!(regions, 1);
    let t = mock.transfers()[0];
    assert_eq!(t.area, Area::from_rectangle(&target).unwrap());
    // Top-left corner pixel sits outside the rounded corner: background.
    assert_eq!(t.first_pixel, Some([0, 0]));
}

#[tokio::test]
async fn worker_step_feeds_input_state_and_renders() {
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let stop = Cell::new(false);
    let state = InputState::new();
    let config = DeckConfig::default();
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let pipe = FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, TIMEOUT).unwrap();
    let ui = DeckUi::new(480, 320);

    let b0 = ui.layout().button(ButtonId::new(0).unwrap()).center();
    let track = ui.layout().slider(SliderId::new(1).unwrap()).track;
    let mut touch = MockTouch::new();
    touch.push(raw_for(b0.x, b0.y)).unwrap();
    touch.push(RawTouchSample::released()).unwrap();
    // Far right end of the second slider's track.
    touch
        .push(raw_for(track.top_left.x + track.size.width as i32 - 1, track.center().y))
        .unwrap();

    let mut worker = DeckWorker::new(touch, CoordinateMapper::from_config(&config), ui, &state, pipe);

    let steps = async {
        let first = worker.step(tick(1)).await;
        assert_eq!(first.event, Some(UiEvent::ButtonPressed(ButtonId::new(0).unwrap())));
        assert!(first.regions >= 11);
        assert!(state.snapshot().is_pressed(ButtonId::new(0).unwrap()));

        let second = worker.step(tick(2)).await;
        assert_eq!(second.event, Some(UiEvent::ButtonReleased(ButtonId::new(0).unwrap())));
        assert_eq!(state.snapshot().buttons, 0);

        let third = worker.step(tick(3)).await;
        assert!(matches!(third.event, Some(UiEvent::SliderChanged(_, v)) if v.get() == 100));
        assert_eq!(state.snapshot().slider(SliderId::new(1).unwrap()).get(), 100);

        worker.pipeline_mut().flush().await.unwrap();
        stop.set(true);
    };
    join(steps, hardware(&mock, &done, &stop)).await;
}

#[tokio::test]
async fn display_fault_does_not_stop_touch_or_input() {
    init_logging();
    // Transfers never complete.
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let state = InputState::new();
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let pipe =
        FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, Duration::from_millis(20))
            .unwrap();
    let ui = DeckUi::new(480, 320);
    let b3 = ui.layout().button(ButtonId::new(3).unwrap()).center();

    let mut touch = MockTouch::new();
    touch.push(RawTouchSample::released()).unwrap();
    touch.push(raw_for(b3.x, b3.y)).unwrap();
    let mapper = CoordinateMapper::from_config(&DeckConfig::default());
    let mut worker = DeckWorker::new(touch, mapper, ui, &state, pipe);

    // First band goes out and wedges; the second band's submit times out.
    let first = worker.step(tick(1)).await;
    assert_eq!(first.event, None);
    assert_eq!(first.regions, 0);
    assert!(worker.pipeline().is_halted());
    assert_eq!(worker.pipeline().faults_raised(), 1);

    let second = worker.step(tick(2)).await;
    assert_eq!(second.event, Some(UiEvent::ButtonPressed(ButtonId::new(3).unwrap())));
    assert_eq!(second.regions, 0);
    assert!(state.snapshot().is_pressed(ButtonId::new(3).unwrap()));
    assert_eq!(worker.pipeline().faults_raised(), 1);
    assert_eq!(mock.transfer_count(), 1);
}

#[tokio::test]
async fn idle_ticks_detect_a_wedged_last_band() {
    init_logging();
    // Transfers never complete.
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let state = InputState::new();
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let pipe =
        FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, Duration::from_millis(20))
            .unwrap();
    let mut ui = DeckUi::new(480, 320);
    let _ = ui.take_dirty();
    let b1 = ui.layout().button(ButtonId::new(1).unwrap()).center();

    // Press and hold: one band goes out, then nothing else is dirty.
    let mut touch = MockTouch::new();
    touch.push(raw_for(b1.x, b1.y)).unwrap();
    let mapper = CoordinateMapper::from_config(&DeckConfig::default());
    let mut worker = DeckWorker::new(touch, mapper, ui, &state, pipe);

    let first = worker.step(tick(1)).await;
    assert_eq!(first.regions, 1);
    assert!(!worker.pipeline().is_halted());

    for seq in 2..22 {
        Timer::after_millis(10).await;
        let out = worker.step(tick(seq)).await;
        assert_eq!(out.event, None);
        assert_eq!(out.regions, 0);
    }
    assert!(worker.pipeline().is_halted());
    assert_eq!(worker.pipeline().faults_raised(), 1);
    assert_eq!(mock.transfer_count(), 1);
    assert!(state.snapshot().is_pressed(ButtonId::new(1).unwrap()));
}

#[tokio::test]
async fn app_slider_updates_reach_the_report() {
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let stop = Cell::new(false);
    let state = InputState::new();
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let pipe = FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, TIMEOUT).unwrap();
    let mut ui = DeckUi::new(480, 320);
    let _ = ui.take_dirty();
    let mapper = CoordinateMapper::from_config(&DeckConfig::default());
    let mut worker = DeckWorker::new(MockTouch::new(), mapper, ui, &state, pipe);

    let s0 = SliderId::new(0).unwrap();
    worker.set_slider_value(s0, SliderValue::new(30));
    assert_eq!(worker.ui().slider(s0).unwrap().value().get(), 30);
    assert_eq!(build_report(&state.snapshot()).as_bytes(), &[0, 30, 50, 50]);

    let steps = async {
        let out = worker.step(tick(1)).await;
        assert!(out.regions >= 1);
        worker.pipeline_mut().flush().await.unwrap();
        stop.set(true);
    };
    join(steps, hardware(&mock, &done, &stop)).await;
}

#[test]
fn worker_reports_slider_values_set_before_it_starts() {
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let state = InputState::new();
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let pipe = FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, TIMEOUT).unwrap();
    let mut ui = DeckUi::new(480, 320);
    ui.set_slider_value(SliderId::new(2).unwrap(), SliderValue::new(75));
    let mapper = CoordinateMapper::from_config(&DeckConfig::default());
    let _worker = DeckWorker::new(MockTouch::new(), mapper, ui, &state, pipe);

    assert_eq!(build_report(&state.snapshot()).as_bytes(), &[0, 50, 50, 75]);
}

#[tokio::test]
async fn touch_errors_are_skipped() {
    init_logging();
    let mock = MockDisplayTransport::new();
    let done = FlushCompletion::new();
    let stop = Cell::new(false);
    let state = InputState::new();
    let (mut a, mut b) = (vec![0u8; BAND_BUFFER_SIZE], vec![0u8; BAND_BUFFER_SIZE]);
    let pipe = FlushPipeline::new([&mut a[..], &mut b[..]], &mock, &done, TIMEOUT).unwrap();
    let mut touch = MockTouch::new();
    touch.push_error(TouchError::Bus).unwrap();
    let mapper = CoordinateMapper::from_config(&DeckConfig::default());
    let mut worker = DeckWorker::new(touch, mapper, DeckUi::new(480, 320), &state, pipe);

    let steps = async {
        let out = worker.step(tick(1)).await;
        assert_eq!(out.event, None);
        assert_eq!(out.regions, 11);
        worker.pipeline_mut().flush().await.unwrap();
        stop.set(true);
    };
    join(steps, hardware(&mock, &done, &stop)).await;
    assert_eq!(worker.touch_mut().reads(), 1);
}
