//! Deck renderer.
//!
//! [`DeckScene`] draws the whole deck onto any `Rgb565` draw target; on a
//! [`BandTarget`] everything outside the band is clipped. [`render_dirty`]
//! turns the UI's dirty rectangles into band-sized regions and pushes them
//! through the [`FlushPipeline`].

// Widget geometry is derived from a u16 logical screen, so coordinates fit
// comfortably in i32 and sizes in u32.
#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::arithmetic_side_effects
)]

use core::fmt::Write as _;

use embedded_graphics::mono_font::{ascii::FONT_7X13, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use platform::display::BYTES_PER_PIXEL;
use platform::{Area, ButtonId, DisplayTransport, FlushAck, SliderId};
use ui::deck::{BACKGROUND, INDICATOR_COLOR, KNOB_COLOR, TEXT_COLOR, TRACK_COLOR};
use ui::layout::{BUTTON_RADIUS, KNOB_DIAMETER};
use ui::DeckUi;

use crate::display::{BandTarget, DirtyRegion, FlushError, FlushPipeline};

fn centered() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build()
}

fn overlaps(a: &Rectangle, clip: &Rectangle) -> bool {
    let i = a.intersection(clip);
    i.size.width > 0 && i.size.height > 0
}

/// Full deck scene: button grid plus slider strip.
pub struct DeckScene;

impl DeckScene {
    /// Draw every widget that overlaps the target's bounding box.
    ///
    /// # Errors
    ///
    /// Returns `D::Error` if any drawing operation fails.
    pub fn render<D>(ui: &DeckUi, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let clip = display.bounding_box();
        clip.into_styled(PrimitiveStyle::with_fill(BACKGROUND))
            .draw(display)?;

        let text = MonoTextStyle::new(&FONT_7X13, TEXT_COLOR);
        let layout = ui.layout();

        for id in ButtonId::all() {
            let rect = layout.button(id);
            let Some(button) = ui.button(id) else { continue };
            if !overlaps(&rect, &clip) {
                continue;
            }
            RoundedRectangle::with_equal_corners(rect, Size::new(BUTTON_RADIUS, BUTTON_RADIUS))
                .into_styled(PrimitiveStyle::with_fill(button.fill()))
                .draw(display)?;
            Text::with_text_style(button.label(), rect.center(), text, centered())
                .draw(display)?;
        }

        for id in SliderId::all() {
            let geo = layout.slider(id);
            let Some(slider) = ui.slider(id) else { continue };
            if !overlaps(&geo.bounds, &clip) {
                continue;
            }
            Text::with_text_style(slider.name(), geo.name_anchor, text, centered())
                .draw(display)?;

            let radius = Size::new(geo.track.size.height / 2, geo.track.size.height / 2);
            RoundedRectangle::with_equal_corners(geo.track, radius)
                .into_styled(PrimitiveStyle::with_fill(TRACK_COLOR))
                .draw(display)?;

            let knob = geo.knob_center(slider.value());
            let filled = (knob.x - geo.track.top_left.x).max(0) as u32;
            if filled > 0 {
                RoundedRectangle::with_equal_corners(
                    Rectangle::new(geo.track.top_left, Size::new(filled, geo.track.size.height)),
                    radius,
                )
                .into_styled(PrimitiveStyle::with_fill(INDICATOR_COLOR))
                .draw(display)?;
            }
            Circle::with_center(knob, KNOB_DIAMETER)
                .into_styled(PrimitiveStyle::with_fill(KNOB_COLOR))
                .draw(display)?;

            let mut value: heapless::String<4> = heapless::String::new();
            let _ = write!(value, "{}", slider.value().get());
            Text::with_text_style(&value, geo.value_anchor, text, centered()).draw(display)?;
        }

        Ok(())
    }
}

/// Redraw every dirty rectangle through the flush pipeline.
///
/// Each rectangle is split into bands no taller than one pool buffer holds.
/// Returns the number of regions submitted. On error the whole screen is
/// marked dirty again so the next pass after recovery repaints it.
pub async fn render_dirty<T, A>(
    ui: &mut DeckUi,
    pipeline: &mut FlushPipeline<'_, T, A>,
) -> Result<usize, FlushError>
where
    T: DisplayTransport,
    A: FlushAck,
{
    let rects = ui.take_dirty();
    let mut submitted = 0;
    for rect in &rects {
        let Some(area) = Area::from_rectangle(rect) else {
            continue;
        };
        match render_area(ui, pipeline, area).await {
            Ok(n) => submitted += n,
            Err(e) => {
                ui.invalidate_all();
                return Err(e);
            }
        }
    }
    Ok(submitted)
}

async fn render_area<T, A>(
    ui: &DeckUi,
    pipeline: &mut FlushPipeline<'_, T, A>,
    area: Area,
) -> Result<usize, FlushError>
where
    T: DisplayTransport,
    A: FlushAck,
{
    let row_bytes = area.width() as usize * BYTES_PER_PIXEL;
    let rows = pipeline
        .buffer_len()
        .checked_div(row_bytes)
        .filter(|r| *r > 0)
        .ok_or(FlushError::InvalidRegion)?;
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);

    let mut submitted = 0;
    let mut y1 = area.y1;
    loop {
        let y2 = y1.saturating_add(rows - 1).min(area.y2);
        let band = Area::new(area.x1, y1, area.x2, y2)?;
        let id = pipeline.acquire().await?;
        let result = match draw_band(ui, pipeline, id, band) {
            Ok(()) => pipeline.submit(DirtyRegion::new(band, id)).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            // No-op if the transport already took the buffer.
            pipeline.release(id);
            return Err(e);
        }
        submitted += 1;
        if y2 >= area.y2 {
            return Ok(submitted);
        }
        y1 = y2 + 1;
    }
}

fn draw_band<T, A>(
    ui: &DeckUi,
    pipeline: &mut FlushPipeline<'_, T, A>,
    id: crate::display::BufferId,
    band: Area,
) -> Result<(), FlushError>
where
    T: DisplayTransport,
    A: FlushAck,
{
    let mut target = BandTarget::new(pipeline.pixels_mut(id)?, band)?;
    match DeckScene::render(ui, &mut target) {
        Ok(()) => Ok(()),
        Err(never) => match never {},
    }
}
