//! Deck widget state and pointer handling.
//!
//! Buttons and sliders are fixed-size arrays addressed by [`ButtonId`] and
//! [`SliderId`]; their count is a protocol constant, not a runtime choice.

use core::fmt::Write as _;

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use heapless::String;
use platform::{ButtonId, LogicalPoint, SliderId, SliderValue, BUTTON_COUNT, SLIDER_COUNT};

use crate::dirty::DirtyTracker;
use crate::layout::DeckLayout;

/// Screen background.
pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
/// Label text.
pub const TEXT_COLOR: Rgb565 = Rgb565::WHITE;
/// Idle button fill.
pub const BUTTON_COLOR: Rgb565 = Rgb565::BLUE;
/// Fill while a button is held.
pub const PRESSED_COLOR: Rgb565 = Rgb565::GREEN;
/// Slider track.
pub const TRACK_COLOR: Rgb565 = Rgb565::BLUE;
/// Filled part of a slider track.
pub const INDICATOR_COLOR: Rgb565 = Rgb565::RED;
/// Slider knob.
pub const KNOB_COLOR: Rgb565 = Rgb565::GREEN;

/// Longest button label kept.
pub const LABEL_CAPACITY: usize = 16;
/// Longest slider name kept.
pub const NAME_CAPACITY: usize = 8;

const DEFAULT_SLIDER_NAMES: [&str; SLIDER_COUNT] = ["VOL", "BRT", "SPD"];

/// Any deck widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetId {
    /// One of the eight buttons
    Button(ButtonId),
    /// One of the three sliders
    Slider(SliderId),
}

/// Result of feeding a touch point to the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Finger went down on a button
    ButtonPressed(ButtonId),
    /// Finger lifted from a held button
    ButtonReleased(ButtonId),
    /// A slider moved to a new value
    SliderChanged(SliderId, SliderValue),
}

/// One button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonWidget {
    label: String<LABEL_CAPACITY>,
    color: Rgb565,
    pressed: bool,
}

impl ButtonWidget {
    /// Label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Idle fill color.
    pub fn color(&self) -> Rgb565 {
        self.color
    }

    /// True while held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Color the button is drawn with right now.
    pub fn fill(&self) -> Rgb565 {
        if self.pressed {
            PRESSED_COLOR
        } else {
            self.color
        }
    }
}

/// One slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderWidget {
    name: String<NAME_CAPACITY>,
    value: SliderValue,
}

impl SliderWidget {
    /// Name label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value.
    pub fn value(&self) -> SliderValue {
        self.value
    }
}

/// Explicitly owned deck UI state.
#[derive(Debug, Clone)]
pub struct DeckUi {
    layout: DeckLayout,
    buttons: [ButtonWidget; BUTTON_COUNT],
    sliders: [SliderWidget; SLIDER_COUNT],
    dirty: DirtyTracker,
    active: Option<WidgetId>,
}

impl DeckUi {
    /// Deck for a `width` × `height` logical screen with default labels
    /// ("Btn 1".."Btn 8"; "VOL", "BRT", "SPD" at 50).
    pub fn new(width: u16, height: u16) -> Self {
        let layout = DeckLayout::new(width, height);
        let buttons = core::array::from_fn(|i| {
            let mut label = String::new();
            // "Btn 8" is five bytes; always fits.
            write!(label, "Btn {}", i.saturating_add(1)).ok();
            ButtonWidget {
                label,
                color: BUTTON_COLOR,
                pressed: false,
            }
        });
        let sliders = core::array::from_fn(|i| SliderWidget {
            name: truncated(DEFAULT_SLIDER_NAMES.get(i).copied().unwrap_or("")),
            value: SliderValue::DEFAULT,
        });
        let dirty = DirtyTracker::new(layout.screen());
        Self {
            layout,
            buttons,
            sliders,
            dirty,
            active: None,
        }
    }

    /// Geometry in use.
    pub fn layout(&self) -> &DeckLayout {
        &self.layout
    }

    /// Button `id`.
    pub fn button(&self, id: ButtonId) -> Option<&ButtonWidget> {
        self.buttons.get(id.index())
    }

    /// Slider `id`.
    pub fn slider(&self, id: SliderId) -> Option<&SliderWidget> {
        self.sliders.get(id.index())
    }

    /// Widget currently tracking the finger.
    pub fn active(&self) -> Option<WidgetId> {
        self.active
    }

    /// Move slider `id` to `value`.
    pub fn set_slider_value(&mut self, id: SliderId, value: SliderValue) {
        if let Some(s) = self.sliders.get_mut(id.index()) {
            s.value = value;
            self.invalidate(WidgetId::Slider(id));
        }
    }

    /// Rename slider `id`; names longer than [`NAME_CAPACITY`] bytes are cut.
    pub fn set_slider_name(&mut self, id: SliderId, name: &str) {
        if let Some(s) = self.sliders.get_mut(id.index()) {
            s.name = truncated(name);
            self.invalidate(WidgetId::Slider(id));
        }
    }

    /// Change the idle fill of button `id`.
    pub fn set_button_color(&mut self, id: ButtonId, color: Rgb565) {
        if let Some(b) = self.buttons.get_mut(id.index()) {
            b.color = color;
            self.invalidate(WidgetId::Button(id));
        }
    }

    /// Relabel button `id`; labels longer than [`LABEL_CAPACITY`] bytes are cut.
    pub fn set_button_label(&mut self, id: ButtonId, label: &str) {
        if let Some(b) = self.buttons.get_mut(id.index()) {
            b.label = truncated(label);
            self.invalidate(WidgetId::Button(id));
        }
    }

    /// Feed one logical touch point.
    ///
    /// A press lands on whatever widget is under it and that widget keeps the
    /// finger until release, so dragging off a slider keeps moving it
    /// (clamped) and dragging off a button does not release it early.
    pub fn handle_pointer(&mut self, point: LogicalPoint) -> Option<UiEvent> {
        let at = Point::new(i32::from(point.x), i32::from(point.y));
        if !point.is_pressed() {
            return match self.active.take() {
                Some(WidgetId::Button(id)) => {
                    self.set_pressed(id, false);
                    Some(UiEvent::ButtonReleased(id))
                }
                Some(WidgetId::Slider(_)) | None => None,
            };
        }
        match self.active {
            Some(WidgetId::Slider(id)) => self.drag_slider(id, at.x),
            Some(WidgetId::Button(_)) => None,
            None => match self.layout.hit(at)? {
                WidgetId::Button(id) => {
                    self.active = Some(WidgetId::Button(id));
                    self.set_pressed(id, true);
                    Some(UiEvent::ButtonPressed(id))
                }
                WidgetId::Slider(id) => {
                    self.active = Some(WidgetId::Slider(id));
                    self.drag_slider(id, at.x)
                }
            },
        }
    }

    /// Mark the whole screen for redraw.
    pub fn invalidate_all(&mut self) {
        self.dirty.mark_all();
    }

    /// Pending dirty rectangles.
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Drain pending dirty rectangles.
    pub fn take_dirty(&mut self) -> heapless::Vec<Rectangle, { crate::dirty::MAX_DIRTY }> {
        self.dirty.take_dirty()
    }

    fn set_pressed(&mut self, id: ButtonId, pressed: bool) {
        if let Some(b) = self.buttons.get_mut(id.index()) {
            b.pressed = pressed;
            self.invalidate(WidgetId::Button(id));
        }
    }

    fn drag_slider(&mut self, id: SliderId, x: i32) -> Option<UiEvent> {
        let value = self.layout.slider(id).value_at(x);
        let current = self.slider(id)?.value;
        if value == current {
            return None;
        }
        self.set_slider_value(id, value);
        Some(UiEvent::SliderChanged(id, value))
    }

    fn invalidate(&mut self, id: WidgetId) {
        let bounds = self.layout.bounds(id);
        self.dirty.mark(bounds);
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
