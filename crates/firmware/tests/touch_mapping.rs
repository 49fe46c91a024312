//! Touch coordinate mapping across all four orientations.
//!
//! Run with: cargo test -p firmware --test touch_mapping
#![allow(clippy::unwrap_used)]

use firmware::CoordinateMapper;
use platform::{Orientation, RawTouchSample, TouchState};
use proptest::prelude::*;

const NATIVE: (u16, u16) = (480, 320);

fn any_mode() -> impl Strategy<Value = Orientation> {
    proptest::sample::select(Orientation::ALL.to_vec())
}

#[test]
fn landscape_maps_reference_point() {
    let p = CoordinateMapper::map(RawTouchSample::pressed(100, 50), Orientation::Landscape, NATIVE);
    assert_eq!((p.x, p.y), (100, 270));
    assert_eq!(p.state, TouchState::Pressed);
}

#[test]
fn origin_lands_on_a_corner_in_every_mode() {
    for mode in Orientation::ALL {
        let (w, h) = mode.logical_size(NATIVE.0, NATIVE.1);
        let p = CoordinateMapper::map(RawTouchSample::pressed(0, 0), mode, NATIVE);
        assert!(p.x == 0 || p.x == w, "{mode:?}: x {}", p.x);
        assert!(p.y == 0 || p.y == h, "{mode:?}: y {}", p.y);
    }
}

#[test]
fn release_ignores_mode() {
    for mode in Orientation::ALL {
        let p = CoordinateMapper::map(RawTouchSample::released(), mode, NATIVE);
        assert!(!p.is_pressed());
    }
}

proptest! {
    /// Any sample, in range or not, maps inside the logical screen.
    #[test]
    fn mapping_is_total_and_bounded(mode in any_mode(), x in any::<u16>(), y in any::<u16>()) {
        let (w, h) = mode.logical_size(NATIVE.0, NATIVE.1);
        let p = CoordinateMapper::map(RawTouchSample::pressed(x, y), mode, NATIVE);
        prop_assert!(p.is_pressed());
        prop_assert!(p.x <= w, "{:?}: x {} > {}", mode, p.x, w);
        prop_assert!(p.y <= h, "{:?}: y {} > {}", mode, p.y, h);
    }

    /// Out-of-range samples map where their clamped counterpart does.
    #[test]
    fn out_of_range_equals_clamped(mode in any_mode(), x in 481u16.., y in 321u16..) {
        let wild = CoordinateMapper::map(RawTouchSample::pressed(x, y), mode, NATIVE);
        let edge = CoordinateMapper::map(RawTouchSample::pressed(NATIVE.0, NATIVE.1), mode, NATIVE);
        prop_assert_eq!(wild, edge);
    }

    /// Distinct in-range samples stay distinct.
    #[test]
    fn in_range_mapping_is_injective(
        mode in any_mode(),
        a in (0u16..=480, 0u16..=320),
        b in (0u16..=480, 0u16..=320),
    ) {
        prop_assume!(a != b);
        let pa = CoordinateMapper::map(RawTouchSample::pressed(a.0, a.1), mode, NATIVE);
        let pb = CoordinateMapper::map(RawTouchSample::pressed(b.0, b.1), mode, NATIVE);
        prop_assert_ne!((pa.x, pa.y), (pb.x, pb.y));
    }
}
