//! Shared input state.
//!
//! Buttons and sliders live in one `AtomicU32`, laid out exactly like the
//! wire report (little-endian bytes: buttons, slider 1, slider 2, slider 3).
//! A snapshot is therefore one atomic load and is always self-consistent,
//! even when the UI and the report loop run in different contexts.

use core::sync::atomic::{AtomicU32, Ordering};

use platform::{ButtonId, SliderId, SliderValue, SLIDER_COUNT};
use ui::UiEvent;

/// Point-in-time copy of [`InputState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Button bitmap, bit 0 = button 1
    pub buttons: u8,
    /// Slider magnitudes in report order
    pub sliders: [SliderValue; SLIDER_COUNT],
}

impl InputSnapshot {
    /// True when `id` is held.
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons & id.mask() != 0
    }

    /// Value of slider `id`.
    pub fn slider(&self, id: SliderId) -> SliderValue {
        self.sliders.get(id.index()).copied().unwrap_or_default()
    }

    fn pack(&self) -> u32 {
        let [a, b, c] = self.sliders;
        u32::from_le_bytes([self.buttons, a.get(), b.get(), c.get()])
    }

    fn unpack(raw: u32) -> Self {
        let [buttons, a, b, c] = raw.to_le_bytes();
        Self {
            buttons,
            sliders: [SliderValue::new(a), SliderValue::new(b), SliderValue::new(c)],
        }
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            buttons: 0,
            sliders: [SliderValue::DEFAULT; SLIDER_COUNT],
        }
    }
}

/// Button bitmap plus three sliders, updated without locks.
pub struct InputState {
    raw: AtomicU32,
}

impl InputState {
    /// No buttons held, every slider at its default.
    pub const fn new() -> Self {
        let d = SliderValue::DEFAULT.get();
        Self {
            raw: AtomicU32::new(u32::from_le_bytes([0, d, d, d])),
        }
    }

    /// State starting from `snapshot`.
    pub fn from_snapshot(snapshot: InputSnapshot) -> Self {
        Self {
            raw: AtomicU32::new(snapshot.pack()),
        }
    }

    /// Consistent copy of every field.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::unpack(self.raw.load(Ordering::Acquire))
    }

    /// Set or clear one button.
    pub fn set_button(&self, id: ButtonId, pressed: bool) {
        self.update(|s| {
            if pressed {
                s.buttons |= id.mask();
            } else {
                s.buttons &= !id.mask();
            }
        });
    }

    /// Store a slider value (already clamped by construction).
    pub fn set_slider(&self, id: SliderId, value: SliderValue) {
        self.update(|s| {
            if let Some(slot) = s.sliders.get_mut(id.index()) {
                *slot = value;
            }
        });
    }

    /// Fold one UI event into the state.
    pub fn apply(&self, event: UiEvent) {
        match event {
            UiEvent::ButtonPressed(id) => self.set_button(id, true),
            UiEvent::ButtonReleased(id) => self.set_button(id, false),
            UiEvent::SliderChanged(id, value) => self.set_slider(id, value),
        }
    }

    fn update(&self, mut f: impl FnMut(&mut InputSnapshot)) {
        // The closure never declines, so fetch_update cannot fail.
        let _ = self
            .raw
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                let mut s = InputSnapshot::unpack(raw);
                f(&mut s);
                Some(s.pack())
            });
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_released_at_defaults() {
        let s = InputState::new().snapshot();
        assert_eq!(s, InputSnapshot::default());
        assert_eq!(s.sliders, [SliderValue::DEFAULT; 3]);
    }

    #[test]
    fn buttons_are_independent_bits() {
        let state = InputState::new();
        state.set_button(ButtonId::new(0).unwrap(), true);
        state.set_button(ButtonId::new(2).unwrap(), true);
        assert_eq!(state.snapshot().buttons, 0b0000_0101);
        state.set_button(ButtonId::new(0).unwrap(), false);
        assert_eq!(state.snapshot().buttons, 0b0000_0100);
    }

    #[test]
    fn sliders_do_not_disturb_buttons() {
        let state = InputState::new();
        state.set_button(ButtonId::new(7).unwrap(), true);
        state.set_slider(SliderId::new(1).unwrap(), SliderValue::new(99));
        let s = state.snapshot();
        assert_eq!(s.buttons, 0x80);
        assert_eq!(s.slider(SliderId::new(1).unwrap()).get(), 99);
        assert_eq!(s.slider(SliderId::new(0).unwrap()), SliderValue::DEFAULT);
    }

    #[test]
    fn ui_events_apply() {
        let state = InputState::new();
        let b = ButtonId::new(3).unwrap();
        let sl = SliderId::new(2).unwrap();
        state.apply(UiEvent::ButtonPressed(b));
        state.apply(UiEvent::SliderChanged(sl, SliderValue::new(7)));
        assert!(state.snapshot().is_pressed(b));
        assert_eq!(state.snapshot().slider(sl).get(), 7);
        state.apply(UiEvent::ButtonReleased(b));
        assert!(!state.snapshot().is_pressed(b));
    }

    #[test]
    fn concurrent_writers_keep_every_field() {
        let state = InputState::new();
        std::thread::scope(|scope| {
            for id in ButtonId::all() {
                let state = &state;
                scope.spawn(move || state.set_button(id, true));
            }
            for id in SliderId::all() {
                let state = &state;
                scope.spawn(move || state.set_slider(id, SliderValue::MAX));
            }
        });
        let s = state.snapshot();
        assert_eq!(s.buttons, 0xFF);
        assert_eq!(s.sliders, [SliderValue::MAX; 3]);
    }
}
