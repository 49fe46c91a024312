//! Startup configuration and device constants
//!
//! Values here are fixed once at startup and shared by every subsystem.
//! How they are loaded (flash, host tool, compile-time constants) is up to
//! the binary; this module only defines and validates them.

use crate::display::BYTES_PER_PIXEL;
use crate::orientation::Orientation;

/// The product name
pub const APP_NAME: &str = "Touch Deck";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Partial framebuffer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Buffering {
    /// One band buffer; rendering waits for every transfer
    Single,
    /// Two band buffers; the next band renders while the previous drains
    #[default]
    Double,
}

impl Buffering {
    /// Number of band buffers.
    pub const fn count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

/// Deck startup parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeckConfig {
    /// Native horizontal extent of panel and sensor
    pub width: u16,
    /// Native vertical extent of panel and sensor
    pub height: u16,
    /// Rotation shared by display and touch
    pub orientation: Orientation,
    /// Tick period in milliseconds
    pub tick_period_ms: u32,
    /// Rows per partial framebuffer
    pub band_height: u16,
    /// Single or double buffering
    pub buffering: Buffering,
    /// Time allowed for one transfer before the display is declared wedged
    pub flush_timeout_ms: u32,
    /// Send an input report every N ticks
    pub report_interval_ticks: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            orientation: Orientation::InvertedLandscape,
            tick_period_ms: 10,
            band_height: 30,
            buffering: Buffering::Double,
            flush_timeout_ms: 500,
            report_interval_ticks: 1,
        }
    }
}

impl DeckConfig {
    /// Check every parameter; returns the first rejected one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        let (_, logical_height) = self.logical_size();
        if self.band_height == 0 || self.band_height > logical_height {
            return Err(ConfigError::BandHeight);
        }
        if self.flush_timeout_ms <= self.tick_period_ms {
            return Err(ConfigError::FlushTimeout);
        }
        if self.report_interval_ticks == 0 {
            return Err(ConfigError::ReportInterval);
        }
        Ok(())
    }

    /// Logical screen extents after the orientation's axis swap.
    pub fn logical_size(&self) -> (u16, u16) {
        self.orientation.logical_size(self.width, self.height)
    }

    /// Bytes needed for one band buffer.
    pub fn buffer_len_bytes(&self) -> usize {
        let (logical_width, _) = self.logical_size();
        usize::from(logical_width)
            .saturating_mul(usize::from(self.band_height))
            .saturating_mul(BYTES_PER_PIXEL)
    }

    /// Number of band buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffering.count()
    }
}

/// Rejected startup parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    ZeroResolution,
    /// Tick period is zero
    ZeroTickPeriod,
    /// Band height is zero or taller than the logical screen
    BandHeight,
    /// Flush timeout is not longer than one tick
    FlushTimeout,
    /// Report interval is zero
    ReportInterval,
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroResolution => write!(f, "Screen resolution must be non-zero"),
            Self::ZeroTickPeriod => write!(f, "Tick period must be non-zero"),
            Self::BandHeight => write!(f, "Band height must be 1..=logical height"),
            Self::FlushTimeout => write!(f, "Flush timeout must exceed one tick"),
            Self::ReportInterval => write!(f, "Report interval must be non-zero"),
        }
    }
}
