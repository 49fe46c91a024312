//! Touch sensor abstraction

/// One raw sample in sensor-native coordinates.
///
/// At most one contact is carried; `contact_count` is what the hardware
/// reported and may exceed one. A count of zero means no finger is down and
/// `x`/`y` are meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouchSample {
    /// Sensor X
    pub x: u16,
    /// Sensor Y
    pub y: u16,
    /// Number of contacts the sensor reported
    pub contact_count: u8,
}

impl RawTouchSample {
    /// Sample with one contact at `(x, y)`.
    pub const fn pressed(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            contact_count: 1,
        }
    }

    /// Sample with no contact.
    pub const fn released() -> Self {
        Self {
            x: 0,
            y: 0,
            contact_count: 0,
        }
    }

    /// True when at least one contact is present.
    pub const fn is_pressed(&self) -> bool {
        self.contact_count > 0
    }
}

/// Contact state of a logical point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchState {
    /// Finger down
    Pressed,
    /// Finger up
    Released,
}

/// A touch point in logical screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicalPoint {
    /// Screen X
    pub x: u16,
    /// Screen Y
    pub y: u16,
    /// Pressed or released
    pub state: TouchState,
}

impl LogicalPoint {
    /// True when the point carries a contact.
    pub fn is_pressed(&self) -> bool {
        self.state == TouchState::Pressed
    }
}

/// Capacitive touch sensor.
pub trait TouchSensor {
    /// Read the current contact, zero or one point.
    fn read(&mut self) -> impl core::future::Future<Output = Result<RawTouchSample, TouchError>>;
}

/// Touch errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Bus transaction failed
    Bus,
    /// Sensor returned an implausible status
    InvalidData,
}

#[cfg(feature = "std")]
impl std::error::Error for TouchError {}

impl core::fmt::Display for TouchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => write!(f, "Touch bus error"),
            Self::InvalidData => write!(f, "Touch sensor returned invalid data"),
        }
    }
}
