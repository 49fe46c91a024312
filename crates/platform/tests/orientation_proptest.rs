//! Property-based tests for the shared orientation table.
//! The touch remap must stay inside the logical screen for every mode and
//! every in-range sample, and panel and touch must agree on the screen shape.

use platform::{Orientation, SliderValue};

fn any_mode() -> impl proptest::strategy::Strategy<Value = Orientation> {
    proptest::sample::select(Orientation::ALL.to_vec())
}

proptest::proptest! {
    /// Every in-range sample lands inside the rotated bounds.
    #[test]
    fn touch_remap_stays_in_logical_bounds(
        mode in any_mode(),
        w in 1u16..=1024,
        h in 1u16..=1024,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x, y) = ((f64::from(w) * fx) as u16, (f64::from(h) * fy) as u16);
        let (lw, lh) = mode.logical_size(w, h);
        let (lx, ly) = mode.transform().touch.apply_point(x, y, w, h);
        assert!(lx <= lw, "{mode:?}: x {lx} > {lw}");
        assert!(ly <= lh, "{mode:?}: y {ly} > {lh}");
    }

    /// Panel and touch rows agree on whether the screen is rotated a quarter turn
    /// relative to the native extents.
    #[test]
    fn panel_and_touch_agree_on_logical_shape(mode in any_mode()) {
        let row = mode.transform();
        let native_landscape = row.panel.apply_size(320, 480) == (480, 320);
        let logical_landscape = mode.logical_size(480, 320) == (480, 320);
        assert_eq!(native_landscape, logical_landscape, "{mode:?}");
    }

    /// The remap is a bijection on the corner points of the bounds.
    #[test]
    fn corners_map_to_corners(mode in any_mode(), w in 1u16..=800, h in 1u16..=800) {
        let (lw, lh) = mode.logical_size(w, h);
        for (x, y) in [(0, 0), (w, 0), (0, h), (w, h)] {
            let (lx, ly) = mode.transform().touch.apply_point(x, y, w, h);
            assert!(lx == 0 || lx == lw);
            assert!(ly == 0 || ly == lh);
        }
    }

    /// SliderValue::new never produces a value above 100.
    #[test]
    fn slider_value_new_never_exceeds_100(v in 0u8..=255u8) {
        assert!(SliderValue::new(v).get() <= 100);
    }
}
