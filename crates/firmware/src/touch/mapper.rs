//! Raw touch sample → logical point.

use platform::{DeckConfig, LogicalPoint, Orientation, RawTouchSample, TouchState};

/// Orientation-aware coordinate mapping.
///
/// Holds configuration only: the sensor's native extents and the active
/// mode. [`CoordinateMapper::map`] is the stateless core; the instance
/// methods bind it to one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    mode: Orientation,
    width: u16,
    height: u16,
}

impl CoordinateMapper {
    /// Mapper for a `width` x `height` sensor in `mode`.
    pub const fn new(mode: Orientation, width: u16, height: u16) -> Self {
        Self {
            mode,
            width,
            height,
        }
    }

    /// Mapper for the configured native extents and orientation.
    pub fn from_config(config: &DeckConfig) -> Self {
        Self::new(config.orientation, config.width, config.height)
    }

    /// Active orientation.
    pub fn mode(&self) -> Orientation {
        self.mode
    }

    /// Logical extents points are mapped into.
    pub fn logical_size(&self) -> (u16, u16) {
        self.mode.logical_size(self.width, self.height)
    }

    /// Map one sample with this mapper's configuration.
    pub fn apply(&self, sample: RawTouchSample) -> LogicalPoint {
        Self::map(sample, self.mode, (self.width, self.height))
    }

    /// Map `sample` for `mode` within `bounds` (native width, height).
    ///
    /// Total: coordinates outside `[0, width] x [0, height]` are clamped
    /// first, so the result always lies inside the rotated bounds. A
    /// zero-contact sample maps to a release at the origin.
    pub fn map(sample: RawTouchSample, mode: Orientation, bounds: (u16, u16)) -> LogicalPoint {
        if !sample.is_pressed() {
            return LogicalPoint {
                x: 0,
                y: 0,
                state: TouchState::Released,
            };
        }
        let (width, height) = bounds;
        let x = sample.x.min(width);
        let y = sample.y.min(height);
        let (x, y) = mode.transform().touch.apply_point(x, y, width, height);
        LogicalPoint {
            x,
            y,
            state: TouchState::Pressed,
        }
    }
}
