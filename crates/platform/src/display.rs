//! Display transport abstraction
//!
//! The panel is driven in bands: the renderer fills a partial framebuffer for
//! one rectangle and the transport streams it to the controller. Completion
//! of the transfer is reported asynchronously through [`CompletionNotify`].

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

/// Bytes per pixel on the wire (RGB565).
pub const BYTES_PER_PIXEL: usize = 2;

/// Inclusive screen rectangle `(x1, y1)..=(x2, y2)` in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    /// Left column
    pub x1: u16,
    /// Top row
    pub y1: u16,
    /// Right column (inclusive)
    pub x2: u16,
    /// Bottom row (inclusive)
    pub y2: u16,
}

impl Area {
    /// Create an area, rejecting inverted corners.
    pub fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Result<Self, DisplayError> {
        if x2 < x1 || y2 < y1 {
            return Err(DisplayError::InvalidArea);
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Whole-screen area for a `width` x `height` panel.
    pub fn full(width: u16, height: u16) -> Result<Self, DisplayError> {
        let x2 = width.checked_sub(1).ok_or(DisplayError::InvalidArea)?;
        let y2 = height.checked_sub(1).ok_or(DisplayError::InvalidArea)?;
        Self::new(0, 0, x2, y2)
    }

    /// Columns covered.
    #[allow(clippy::arithmetic_side_effects)] // x2 >= x1 by construction; +1 fits in u32
    pub fn width(&self) -> u32 {
        u32::from(self.x2.saturating_sub(self.x1)) + 1
    }

    /// Rows covered.
    #[allow(clippy::arithmetic_side_effects)] // y2 >= y1 by construction; +1 fits in u32
    pub fn height(&self) -> u32 {
        u32::from(self.y2.saturating_sub(self.y1)) + 1
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> usize {
        (self.width() as usize).saturating_mul(self.height() as usize)
    }

    /// Payload length in bytes for this area.
    pub fn byte_len(&self) -> usize {
        self.pixel_count().saturating_mul(BYTES_PER_PIXEL)
    }

    /// True when `(x, y)` lies inside the area.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }

    /// Convert to an embedded-graphics rectangle.
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(
            Point::new(i32::from(self.x1), i32::from(self.y1)),
            Size::new(self.width(), self.height()),
        )
    }

    /// Convert from an embedded-graphics rectangle.
    ///
    /// Returns `None` for empty rectangles or ones with negative or
    /// out-of-range coordinates.
    pub fn from_rectangle(rect: &Rectangle) -> Option<Self> {
        let bottom_right = rect.bottom_right()?;
        let x1 = u16::try_from(rect.top_left.x).ok()?;
        let y1 = u16::try_from(rect.top_left.y).ok()?;
        let x2 = u16::try_from(bottom_right.x).ok()?;
        let y2 = u16::try_from(bottom_right.y).ok()?;
        Self::new(x1, y1, x2, y2).ok()
    }
}

/// Panel transport: streams one band of RGB565 pixels to the controller.
///
/// `pixels` is row-major, tightly packed, two bytes per pixel, and exactly
/// [`Area::byte_len`] long. The future resolves once the transfer has been
/// *started*; the hardware signals completion later through the
/// [`CompletionNotify`] it was constructed with. The caller guarantees the
/// slice is not mutated until that completion arrives.
pub trait DisplayTransport {
    /// Begin a transfer of `pixels` into `area`.
    fn start_transfer(
        &mut self,
        area: Area,
        pixels: &[u8],
    ) -> impl core::future::Future<Output = Result<(), DisplayError>>;
}

/// Acknowledgment forwarded to the transport once a completed buffer has
/// been released, telling it the driver is ready for more frame data.
///
/// Called from the completion path; implementations must not block.
pub trait FlushAck {
    /// The driver has released the just-completed buffer.
    fn flush_ready(&self);
}

impl FlushAck for () {
    fn flush_ready(&self) {}
}

/// Sink for hardware transfer-complete notifications.
///
/// Implemented by the flush pipeline's completion handle; invoked from
/// interrupt context or an I/O thread, never from the render loop.
pub trait CompletionNotify {
    /// The transfer most recently started has finished on the wire.
    fn notify_complete(&self);
}

impl<T: CompletionNotify + ?Sized> CompletionNotify for &T {
    fn notify_complete(&self) {
        (**self).notify_complete();
    }
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus communication error
    Communication,
    /// Data/command pin error
    Gpio,
    /// Pixel payload length does not match the area
    InvalidBuffer,
    /// Rectangle corners inverted or outside the panel
    InvalidArea,
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Communication => write!(f, "Display communication error"),
            Self::Gpio => write!(f, "Display data/command pin error"),
            Self::InvalidBuffer => write!(f, "Pixel payload does not match area"),
            Self::InvalidArea => write!(f, "Invalid display area"),
        }
    }
}
