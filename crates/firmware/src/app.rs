//! Deck tasks.
//!
//! Two loops, each driven by its own [`TickScheduler`]:
//!
//! - [`DeckWorker`]: touch poll → coordinate map → UI → input state, then a
//!   render pass through the flush pipeline
//! - [`report_loop`]: input state → HID input report, host permitting
//!
//! They share only [`InputState`], which is lock-free. A display fault stops
//! rendering; touch, UI state and reporting carry on.

use embassy_futures::join::join;
use platform::{DisplayTransport, FlushAck, HidTransport, SliderId, SliderValue, TouchSensor};
use ui::{DeckUi, UiEvent};

use crate::display::{FlushError, FlushPipeline};
use crate::hid::{InputReportEncoder, InputState, ReportOutcome};
use crate::render::render_dirty;
use crate::tick::{Tick, TickScheduler};
use crate::touch::CoordinateMapper;

/// What one worker step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// UI event produced by this tick's touch sample
    pub event: Option<UiEvent>,
    /// Regions submitted to the display
    pub regions: usize,
}

/// Touch, UI and render worker.
pub struct DeckWorker<'a, S, T, A = ()> {
    touch: S,
    mapper: CoordinateMapper,
    ui: DeckUi,
    state: &'a InputState,
    pipeline: FlushPipeline<'a, T, A>,
}

impl<'a, S, T, A> DeckWorker<'a, S, T, A>
where
    S: TouchSensor,
    T: DisplayTransport,
    A: FlushAck,
{
    /// Assemble a worker. The UI starts fully dirty, so the first step paints
    /// the whole screen. `state` takes the UI's slider values so the first
    /// report matches what is drawn.
    pub fn new(
        touch: S,
        mapper: CoordinateMapper,
        ui: DeckUi,
        state: &'a InputState,
        pipeline: FlushPipeline<'a, T, A>,
    ) -> Self {
        for id in SliderId::all() {
            if let Some(slider) = ui.slider(id) {
                state.set_slider(id, slider.value());
            }
        }
        Self {
            touch,
            mapper,
            ui,
            state,
            pipeline,
        }
    }

    /// UI state.
    pub fn ui(&self) -> &DeckUi {
        &self.ui
    }

    /// UI state, for cosmetic updates (labels, colours, slider names).
    ///
    /// Slider values are also reported to the host; change them through
    /// [`Self::set_slider_value`] so screen and report stay in step.
    pub fn ui_mut(&mut self) -> &mut DeckUi {
        &mut self.ui
    }

    /// Set a slider from the application side: redraws it and updates the
    /// reported value.
    pub fn set_slider_value(&mut self, id: SliderId, value: SliderValue) {
        self.ui.set_slider_value(id, value);
        self.state.set_slider(id, value);
    }

    /// Flush pipeline.
    pub fn pipeline(&self) -> &FlushPipeline<'a, T, A> {
        &self.pipeline
    }

    /// Flush pipeline, e.g. to clear a fault after a panel reset.
    pub fn pipeline_mut(&mut self) -> &mut FlushPipeline<'a, T, A> {
        &mut self.pipeline
    }

    /// Touch sensor.
    pub fn touch_mut(&mut self) -> &mut S {
        &mut self.touch
    }

    /// Shared input state.
    pub fn state(&self) -> &'a InputState {
        self.state
    }

    /// One tick of work.
    pub async fn step(&mut self, tick: Tick) -> StepOutcome {
        let event = self.poll_touch().await;
        if event.is_some() {
            trace!("ui event at tick {}", tick.seq);
        }

        // Every tick, so a wedged last band is caught while idle.
        let regions = if self.pipeline.poll_health().is_err() {
            0
        } else {
            match render_dirty(&mut self.ui, &mut self.pipeline).await {
                Ok(n) => n,
                // Logged once by the pipeline when raised
                Err(FlushError::HardwareFault | FlushError::Halted) => 0,
                Err(e) => {
                    warn!("render pass failed: {}", e);
                    0
                }
            }
        };

        StepOutcome { event, regions }
    }

    /// Run [`Self::step`] on every tick, forever.
    pub async fn run(&mut self, scheduler: &mut TickScheduler<'_>) {
        loop {
            let tick = scheduler.next().await;
            self.step(tick).await;
        }
    }

    async fn poll_touch(&mut self) -> Option<UiEvent> {
        let sample = match self.touch.read().await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("touch read failed: {}", e);
                return None;
            }
        };
        let point = self.mapper.apply(sample);
        let event = self.ui.handle_pointer(point)?;
        self.state.apply(event);
        Some(event)
    }
}

/// Offer the input report on every tick, forever.
pub async fn report_loop<H: HidTransport>(
    scheduler: &mut TickScheduler<'_>,
    state: &InputState,
    encoder: &mut InputReportEncoder,
    transport: &mut H,
) {
    loop {
        let tick = scheduler.next().await;
        if encoder.on_tick(tick, state, transport) == ReportOutcome::Sent {
            trace!("report sent at tick {}", tick.seq);
        }
    }
}

/// Run the worker and the report loop side by side on one task.
pub async fn run_deck<S, T, A, H>(
    worker: &mut DeckWorker<'_, S, T, A>,
    worker_ticks: &mut TickScheduler<'_>,
    report_ticks: &mut TickScheduler<'_>,
    encoder: &mut InputReportEncoder,
    transport: &mut H,
) where
    S: TouchSensor,
    T: DisplayTransport,
    A: FlushAck,
    H: HidTransport,
{
    let state = worker.state();
    join(
        worker.run(worker_ticks),
        report_loop(report_ticks, state, encoder, transport),
    )
    .await;
}
