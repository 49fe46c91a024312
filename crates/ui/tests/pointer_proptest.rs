//! Property-based tests for deck pointer handling.
//! Any sequence of touch points must leave the deck in a consistent state:
//! at most one button held, and a release always clears the active widget.

use platform::{ButtonId, LogicalPoint, SliderId, TouchState};
use proptest::prelude::*;
use ui::{DeckUi, UiEvent};

fn point() -> impl Strategy<Value = LogicalPoint> {
    (0u16..=480, 0u16..=320, any::<bool>()).prop_map(|(x, y, down)| LogicalPoint {
        x,
        y,
        state: if down {
            TouchState::Pressed
        } else {
            TouchState::Released
        },
    })
}

proptest! {
    #[test]
    fn at_most_one_button_held(points in proptest::collection::vec(point(), 1..64)) {
        let mut deck = DeckUi::new(480, 320);
        for p in points {
            let _ = deck.handle_pointer(p);
            let held = ButtonId::all()
                .filter(|b| deck.button(*b).is_some_and(ui::ButtonWidget::is_pressed))
                .count();
            prop_assert!(held <= 1);
            if !p.is_pressed() {
                prop_assert_eq!(held, 0);
                prop_assert!(deck.active().is_none());
            }
        }
    }

    #[test]
    fn slider_events_carry_the_stored_value(points in proptest::collection::vec(point(), 1..64)) {
        let mut deck = DeckUi::new(480, 320);
        for p in points {
            if let Some(UiEvent::SliderChanged(id, value)) = deck.handle_pointer(p) {
                prop_assert_eq!(deck.slider(id).map(ui::SliderWidget::value), Some(value));
                prop_assert!(value.get() <= 100);
            }
        }
        prop_assert_eq!(SliderId::all().count(), 3);
    }
}
