//! Deck geometry derived from the logical screen size.
//!
//! Upper 11/16 of the screen: a 2 × 4 button grid (10 px padding, 5 px gap).
//! Remaining rows: three slider boxes spaced evenly, each holding a name
//! label, a horizontal track and a value label.

// Coordinates come from u16 screen extents and fit comfortably in i32; the
// arithmetic below cannot overflow.
#![allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use platform::{ButtonId, SliderId, SliderValue, BUTTON_COUNT, SLIDER_COUNT};

use crate::deck::WidgetId;

/// Outer padding of the button grid and slider strip.
pub const PADDING: i32 = 10;
/// Gap between grid cells.
pub const GAP: i32 = 5;
/// Grid columns.
pub const COLUMNS: usize = 4;
/// Grid rows.
pub const ROWS: usize = 2;
/// Button corner radius.
pub const BUTTON_RADIUS: u32 = 8;
/// Widest slider box.
pub const MAX_SLIDER_BOX_WIDTH: i32 = 130;
/// Tallest slider box.
pub const MAX_SLIDER_BOX_HEIGHT: i32 = 80;
/// Track thickness.
pub const TRACK_HEIGHT: u32 = 10;
/// Knob diameter.
pub const KNOB_DIAMETER: u32 = 16;

/// Geometry of one slider box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderGeometry {
    /// Whole box, also the touch target and dirty region
    pub bounds: Rectangle,
    /// Horizontal track
    pub track: Rectangle,
    /// Center of the name label
    pub name_anchor: Point,
    /// Center of the value label
    pub value_anchor: Point,
}

impl SliderGeometry {
    fn new(bounds: Rectangle) -> Self {
        let inset = (KNOB_DIAMETER as i32 / 2) + 7;
        let track_width = (bounds.size.width as i32 - 2 * inset).max(2);
        let center = bounds.center();
        let track = Rectangle::new(
            Point::new(bounds.top_left.x + inset, center.y - TRACK_HEIGHT as i32 / 2),
            Size::new(track_width as u32, TRACK_HEIGHT),
        );
        Self {
            bounds,
            track,
            name_anchor: Point::new(center.x, bounds.top_left.y + 12),
            value_anchor: Point::new(center.x, bounds.top_left.y + bounds.size.height as i32 - 12),
        }
    }

    /// Slider value for a touch at column `x`, clamped to the track ends.
    pub fn value_at(&self, x: i32) -> SliderValue {
        let span = self.track.size.width as i32 - 1;
        let offset = (x - self.track.top_left.x).clamp(0, span);
        let value = offset * 100 / span;
        SliderValue::new(u8::try_from(value).unwrap_or(100))
    }

    /// Knob center for `value`.
    pub fn knob_center(&self, value: SliderValue) -> Point {
        let span = self.track.size.width as i32 - 1;
        Point::new(
            self.track.top_left.x + span * i32::from(value.get()) / 100,
            self.track.center().y,
        )
    }
}

/// Full deck geometry for one logical screen size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLayout {
    screen: Rectangle,
    buttons: [Rectangle; BUTTON_COUNT],
    sliders: [SliderGeometry; SLIDER_COUNT],
}

impl DeckLayout {
    /// Compute the layout for a `width` × `height` logical screen.
    pub fn new(width: u16, height: u16) -> Self {
        let w = i32::from(width);
        let h = i32::from(height);
        let grid_height = h * 11 / 16;

        let cell_w = ((w - 2 * PADDING - (COLUMNS as i32 - 1) * GAP) / COLUMNS as i32).max(1);
        let cell_h = ((grid_height - 2 * PADDING - (ROWS as i32 - 1) * GAP) / ROWS as i32).max(1);
        let buttons = core::array::from_fn(|i| {
            let row = (i / COLUMNS) as i32;
            let col = (i % COLUMNS) as i32;
            Rectangle::new(
                Point::new(
                    PADDING + col * (cell_w + GAP),
                    PADDING + row * (cell_h + GAP),
                ),
                Size::new(cell_w as u32, cell_h as u32),
            )
        });

        let strip_h = h - grid_height;
        let box_w = ((w - 4 * PADDING) / SLIDER_COUNT as i32).clamp(1, MAX_SLIDER_BOX_WIDTH);
        let box_h = (strip_h * 4 / 5).clamp(1, MAX_SLIDER_BOX_HEIGHT);
        let space = (w - SLIDER_COUNT as i32 * box_w) / (SLIDER_COUNT as i32 + 1);
        let box_y = grid_height + (strip_h - box_h) / 2;
        let sliders = core::array::from_fn(|i| {
            let x = space + i as i32 * (box_w + space);
            SliderGeometry::new(Rectangle::new(
                Point::new(x, box_y),
                Size::new(box_w as u32, box_h as u32),
            ))
        });

        Self {
            screen: Rectangle::new(Point::zero(), Size::new(u32::from(width), u32::from(height))),
            buttons,
            sliders,
        }
    }

    /// Whole logical screen.
    pub fn screen(&self) -> Rectangle {
        self.screen
    }

    /// Bounds of button `id`.
    pub fn button(&self, id: ButtonId) -> Rectangle {
        self.buttons.get(id.index()).copied().unwrap_or_default()
    }

    /// Geometry of slider `id`.
    pub fn slider(&self, id: SliderId) -> SliderGeometry {
        match self.sliders.get(id.index()) {
            Some(s) => *s,
            None => SliderGeometry::new(Rectangle::zero()),
        }
    }

    /// Bounds of any widget.
    pub fn bounds(&self, id: WidgetId) -> Rectangle {
        match id {
            WidgetId::Button(b) => self.button(b),
            WidgetId::Slider(s) => self.slider(s).bounds,
        }
    }

    /// Widget under `point`, if any.
    pub fn hit(&self, point: Point) -> Option<WidgetId> {
        if let Some(b) = ButtonId::all().find(|b| self.button(*b).contains(point)) {
            return Some(WidgetId::Button(b));
        }
        SliderId::all()
            .find(|s| self.slider(*s).bounds.contains(point))
            .map(WidgetId::Slider)
    }
}
