//! Dirty-rectangle tracking.
//!
//! Bounded at [`MAX_DIRTY`] entries (embedded-safe, no heap). Overlapping
//! rectangles are merged into their bounding box; when the list overflows it
//! collapses to a single full-screen rectangle.

use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

/// Maximum distinct dirty rectangles before collapsing to full screen.
pub const MAX_DIRTY: usize = 16;

/// Bounded set of screen rectangles awaiting redraw.
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    screen: Rectangle,
    rects: Vec<Rectangle, MAX_DIRTY>,
}

impl DirtyTracker {
    /// Tracker for `screen`, initially fully dirty so the first pass draws
    /// everything.
    pub fn new(screen: Rectangle) -> Self {
        let mut rects = Vec::new();
        // Always succeeds: capacity is MAX_DIRTY > 0.
        rects.push(screen).ok();
        Self { screen, rects }
    }

    /// Mark `rect` dirty. Parts outside the screen are dropped.
    pub fn mark(&mut self, rect: Rectangle) {
        let mut rect = rect.intersection(&self.screen);
        if rect.is_zero_sized() {
            return;
        }
        // Absorb every existing rectangle that touches the new one; repeat
        // because the grown rectangle may now overlap others.
        loop {
            let overlapping = self
                .rects
                .iter()
                .position(|r| !r.intersection(&rect).is_zero_sized());
            match overlapping {
                Some(i) => {
                    let other = self.rects.swap_remove(i);
                    rect = bounding(&rect, &other);
                }
                None => break,
            }
        }
        if self.rects.push(rect).is_err() {
            self.mark_all();
        }
    }

    /// Mark the whole screen dirty.
    pub fn mark_all(&mut self) {
        self.rects.clear();
        self.rects.push(self.screen).ok();
    }

    /// True when nothing needs redrawing.
    pub fn is_clean(&self) -> bool {
        self.rects.is_empty()
    }

    /// Pending rectangles.
    pub fn pending(&self) -> &[Rectangle] {
        &self.rects
    }

    /// Drain all pending rectangles.
    pub fn take_dirty(&mut self) -> Vec<Rectangle, MAX_DIRTY> {
        core::mem::take(&mut self.rects)
    }
}

fn bounding(a: &Rectangle, b: &Rectangle) -> Rectangle {
    let (Some(a_br), Some(b_br)) = (a.bottom_right(), b.bottom_right()) else {
        return if a.is_zero_sized() { *b } else { *a };
    };
    let top_left = a.top_left.component_min(b.top_left);
    let bottom_right = a_br.component_max(b_br);
    Rectangle::with_corners(top_left, bottom_right)
}
