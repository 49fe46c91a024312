//! Orientation modes and the single transform table shared by the display
//! and touch paths.
//!
//! Both paths look their behaviour up in [`TRANSFORMS`]; neither carries its
//! own per-mode `match`. Keeping the panel scan transform and the touch remap
//! on the same row is what keeps visuals and touch in agreement.
//!
//! Touch rows, with `(W, H)` the native bounds:
//!
//! | mode              | logical x | logical y |
//! |-------------------|-----------|-----------|
//! | Portrait          | raw_y     | raw_x     |
//! | Landscape         | raw_x     | H − raw_y |
//! | InvertedPortrait  | H − raw_y | W − raw_x |
//! | InvertedLandscape | W − raw_x | raw_y     |
//!
//! Panel rows are relative to the controller's native portrait scan
//! (320x480 on the ST7796); touch rows are relative to the sensor's native
//! extents, which the deck configures as the landscape `width` x `height`.
//!
//! Only `InvertedLandscape` has been exercised on hardware; the other three
//! rows follow by symmetry and must be checked on a physical panel.

/// Logical rotation applied uniformly to rendering and touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Upright portrait
    Portrait,
    /// Landscape, rotated 90°
    Landscape,
    /// Portrait, rotated 180°
    InvertedPortrait,
    /// Landscape, rotated 270° (reference device default)
    #[default]
    InvertedLandscape,
}

/// Axis swap plus per-axis mirroring.
///
/// Swap is applied first; mirroring then acts on the swapped axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisTransform {
    /// Exchange X and Y
    pub swap_xy: bool,
    /// Reflect the (post-swap) X axis
    pub mirror_x: bool,
    /// Reflect the (post-swap) Y axis
    pub mirror_y: bool,
}

impl AxisTransform {
    const fn new(swap_xy: bool, mirror_x: bool, mirror_y: bool) -> Self {
        Self {
            swap_xy,
            mirror_x,
            mirror_y,
        }
    }

    /// Extents after this transform for a `width` x `height` source.
    pub const fn apply_size(&self, width: u16, height: u16) -> (u16, u16) {
        if self.swap_xy {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map a point already clamped to `[0, width] x [0, height]`.
    ///
    /// Mirrors reflect against the inclusive extent, so the result lies in
    /// `[0, w'] x [0, h']` where `(w', h') = apply_size(width, height)`.
    pub fn apply_point(&self, x: u16, y: u16, width: u16, height: u16) -> (u16, u16) {
        let (mut a, mut b) = if self.swap_xy { (y, x) } else { (x, y) };
        let (extent_a, extent_b) = self.apply_size(width, height);
        if self.mirror_x {
            a = extent_a.saturating_sub(a);
        }
        if self.mirror_y {
            b = extent_b.saturating_sub(b);
        }
        (a, b)
    }
}

/// One row of the orientation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationTransform {
    /// Controller scan transform (MADCTL on ST7796-class panels)
    pub panel: AxisTransform,
    /// Sensor-to-screen remap for touch samples
    pub touch: AxisTransform,
}

/// Orientation table, indexed by [`Orientation::index`].
pub const TRANSFORMS: [OrientationTransform; 4] = [
    // Portrait
    OrientationTransform {
        panel: AxisTransform::new(false, false, true),
        touch: AxisTransform::new(true, false, false),
    },
    // Landscape
    OrientationTransform {
        panel: AxisTransform::new(true, true, true),
        touch: AxisTransform::new(false, false, true),
    },
    // InvertedPortrait
    OrientationTransform {
        panel: AxisTransform::new(false, true, false),
        touch: AxisTransform::new(true, true, true),
    },
    // InvertedLandscape
    OrientationTransform {
        panel: AxisTransform::new(true, false, false),
        touch: AxisTransform::new(false, true, false),
    },
];

impl Orientation {
    /// All modes in table order.
    pub const ALL: [Self; 4] = [
        Self::Portrait,
        Self::Landscape,
        Self::InvertedPortrait,
        Self::InvertedLandscape,
    ];

    /// Row index into [`TRANSFORMS`].
    pub const fn index(self) -> usize {
        match self {
            Self::Portrait => 0,
            Self::Landscape => 1,
            Self::InvertedPortrait => 2,
            Self::InvertedLandscape => 3,
        }
    }

    /// The shared transform row for this mode.
    pub fn transform(self) -> OrientationTransform {
        #[allow(clippy::indexing_slicing)] // index() is 0..=3, table has 4 rows
        TRANSFORMS[self.index()]
    }

    /// Logical screen extents for native `width` x `height`.
    pub fn logical_size(self, width: u16, height: u16) -> (u16, u16) {
        self.transform().touch.apply_size(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_line_up_with_modes() {
        for (i, mode) in Orientation::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn default_is_inverted_landscape() {
        assert_eq!(Orientation::default(), Orientation::InvertedLandscape);
        assert_eq!(Orientation::default().logical_size(480, 320), (480, 320));
    }

    #[test]
    fn portrait_modes_swap_logical_size() {
        assert_eq!(Orientation::Portrait.logical_size(480, 320), (320, 480));
        assert_eq!(
            Orientation::InvertedPortrait.logical_size(480, 320),
            (320, 480)
        );
        assert_eq!(Orientation::Landscape.logical_size(480, 320), (480, 320));
    }

    #[test]
    fn touch_rows_match_documented_table() {
        let (w, h) = (480, 320);
        let (x, y) = (100, 50);
        assert_eq!(
            Orientation::Portrait.transform().touch.apply_point(x, y, w, h),
            (50, 100)
        );
        assert_eq!(
            Orientation::Landscape.transform().touch.apply_point(x, y, w, h),
            (100, 270)
        );
        assert_eq!(
            Orientation::InvertedPortrait
                .transform()
                .touch
                .apply_point(x, y, w, h),
            (270, 380)
        );
        assert_eq!(
            Orientation::InvertedLandscape
                .transform()
                .touch
                .apply_point(x, y, w, h),
            (380, 50)
        );
    }

    #[test]
    fn panel_rows_follow_reference_hardware() {
        let inv = Orientation::InvertedLandscape.transform().panel;
        assert!(inv.swap_xy && !inv.mirror_x && !inv.mirror_y);
        let land = Orientation::Landscape.transform().panel;
        assert!(land.swap_xy && land.mirror_x && land.mirror_y);
    }
}
