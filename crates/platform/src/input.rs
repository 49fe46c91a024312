//! Deck input domain newtypes.
//!
//! Button and slider cardinality is fixed by the HID report layout, so
//! widgets are addressed by small index newtypes rather than collections:
//! - `ButtonId`: 0–7, maps to report byte 0 bit N
//! - `SliderId`: 0–2, maps to report byte N + 1
//! - `SliderValue`: clamps 0–100, the logical range the descriptor declares

/// Number of buttons in the input report.
pub const BUTTON_COUNT: usize = 8;
/// Number of sliders in the input report.
pub const SLIDER_COUNT: usize = 3;
/// Upper bound of a slider's logical range.
pub const SLIDER_MAX: u8 = 100;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} outside {}..={}", self.value, self.min, self.max)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── SliderValue ──────────────────────────────────────────────────────────────

/// Slider position, clamped to 0–100.
///
/// Construct with [`SliderValue::new`] (clamping) or
/// [`SliderValue::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SliderValue(u8);

impl SliderValue {
    /// Minimum position.
    pub const MIN: Self = Self(0);
    /// Maximum position.
    pub const MAX: Self = Self(SLIDER_MAX);
    /// Power-on position.
    pub const DEFAULT: Self = Self(50);

    /// Create a `SliderValue`, clamping values above 100 to 100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(SLIDER_MAX))
    }

    /// Create a `SliderValue`, returning an error if `value > 100`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 100`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > SLIDER_MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(SLIDER_MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner value (0–100).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for SliderValue {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── ButtonId / SliderId ──────────────────────────────────────────────────────

/// Index of one of the eight deck buttons (0-based; button 1 is `ButtonId(0)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(u8);

impl ButtonId {
    /// Create a button index, rejecting `index >= 8`.
    pub fn new(index: u8) -> Result<Self, OutOfRangeError> {
        if usize::from(index) < BUTTON_COUNT {
            Ok(Self(index))
        } else {
            Err(OutOfRangeError {
                value: u32::from(index),
                min: 0,
                max: 7,
            })
        }
    }

    /// All buttons in report bit order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0u8..8).map(Self)
    }

    /// Zero-based index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Bit mask of this button in report byte 0.
    pub fn mask(self) -> u8 {
        1u8.wrapping_shl(u32::from(self.0))
    }
}

/// Index of one of the three deck sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderId(u8);

impl SliderId {
    /// Create a slider index, rejecting `index >= 3`.
    pub fn new(index: u8) -> Result<Self, OutOfRangeError> {
        if usize::from(index) < SLIDER_COUNT {
            Ok(Self(index))
        } else {
            Err(OutOfRangeError {
                value: u32::from(index),
                min: 0,
                max: 2,
            })
        }
    }

    /// All sliders in report order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0u8..3).map(Self)
    }

    /// Zero-based index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}
