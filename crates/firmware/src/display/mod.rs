//! Display path for the touch deck
//!
//! Partial-framebuffer pipeline for the 480×320 ST7796 panel: band buffers
//! ([`pool`]), the interrupt-side completion handoff ([`completion`]), the
//! renderer-facing [`FlushPipeline`], a `DrawTarget` over one band
//! ([`band`]), and the SPI transport ([`st7796`]).

pub mod band;
pub mod completion;
pub mod flush;
pub mod pool;
pub mod st7796;

pub use band::BandTarget;
pub use completion::FlushCompletion;
pub use flush::FlushPipeline;
pub use pool::{BufferId, BufferState, BufferStates, FrameBufferPool, MAX_BUFFERS};
pub use st7796::St7796;

use platform::{Area, DisplayError};

/// Default panel width in pixels (landscape)
pub const DISPLAY_WIDTH: u16 = 480;

/// Default panel height in pixels (landscape)
pub const DISPLAY_HEIGHT: u16 = 320;

/// Default band height in rows
pub const BAND_HEIGHT: u16 = 30;

/// Band buffer size in bytes for the default geometry (RGB565)
#[allow(clippy::arithmetic_side_effects)] // 480 * 30 * 2, evaluated at compile time
pub const BAND_BUFFER_SIZE: usize =
    DISPLAY_WIDTH as usize * BAND_HEIGHT as usize * platform::display::BYTES_PER_PIXEL;

/// A rectangle of rendered pixels waiting in a pool buffer.
///
/// Created by the renderer each pass, consumed exactly once by
/// [`FlushPipeline::submit`]; the buffer returns to the pool when the
/// hardware acknowledges the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyRegion {
    /// Screen rectangle covered
    pub area: Area,
    /// Buffer holding its pixels, row-major from offset 0
    pub buffer: BufferId,
}

impl DirtyRegion {
    /// Region covering `area` in `buffer`.
    pub fn new(area: Area, buffer: BufferId) -> Self {
        Self { area, buffer }
    }
}

/// Display subsystem health.
///
/// `Healthy` until a transfer misses its completion deadline, then latched
/// `Faulted` until explicitly cleared. The transition itself, not caller
/// discipline, is what makes a wedge reportable once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayHealth {
    /// Transfers completing normally
    #[default]
    Healthy,
    /// A transfer never completed; display updates are halted
    Faulted {
        /// Buffer that was in flight when the deadline passed
        buffer: BufferId,
    },
}

impl DisplayHealth {
    /// True while faulted.
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted { .. })
    }

    /// Record a missed deadline. Returns true only on the `Healthy ->
    /// Faulted` edge, i.e. once per incident.
    pub fn on_wedge(&mut self, buffer: BufferId) -> bool {
        match self {
            Self::Healthy => {
                *self = Self::Faulted { buffer };
                true
            }
            Self::Faulted { .. } => false,
        }
    }
}

/// Flush pipeline errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushError {
    /// No buffer or transport slot available right now
    Busy,
    /// A transfer never completed within the timeout (raised once)
    HardwareFault,
    /// Display halted after a hardware fault
    Halted,
    /// Buffer is not owned by the renderer
    NotRendering,
    /// Region does not fit in a band buffer
    InvalidRegion,
    /// Pool needs one or two non-empty, equally sized buffers
    BufferCount,
    /// Transport refused the transfer
    Transport(DisplayError),
}

#[cfg(feature = "std")]
impl std::error::Error for FlushError {}

impl core::fmt::Display for FlushError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => write!(f, "Display pipeline busy"),
            Self::HardwareFault => write!(f, "Display transfer never completed"),
            Self::Halted => write!(f, "Display halted after hardware fault"),
            Self::NotRendering => write!(f, "Buffer not owned by renderer"),
            Self::InvalidRegion => write!(f, "Region does not fit band buffer"),
            Self::BufferCount => write!(f, "Invalid band buffer set"),
            Self::Transport(e) => write!(f, "Display transport error: {e}"),
        }
    }
}

impl From<DisplayError> for FlushError {
    fn from(e: DisplayError) -> Self {
        Self::Transport(e)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wedge_reported_once_per_incident() {
        let id = BufferId::from_raw(0).unwrap();
        let mut health = DisplayHealth::default();
        assert!(health.on_wedge(id));
        assert!(!health.on_wedge(id));
        assert!(!health.on_wedge(id));
        assert_eq!(health, DisplayHealth::Faulted { buffer: id });
    }

    #[test]
    fn band_buffer_matches_default_config() {
        assert_eq!(
            BAND_BUFFER_SIZE,
            platform::DeckConfig::default().buffer_len_bytes()
        );
    }
}
