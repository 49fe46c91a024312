//! Touch input path.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`CoordinateMapper`] | Sensor-native sample → logical screen point |
//! | [`Gt911`] | GT911 capacitive controller over async I²C |
//!
//! Both sides of the orientation contract (panel scan and touch remap) come
//! from the same [`platform::Orientation::transform`] row, so a mode change
//! cannot desynchronise touch from visuals.

pub mod gt911;
pub mod mapper;

pub use gt911::Gt911;
pub use mapper::CoordinateMapper;
