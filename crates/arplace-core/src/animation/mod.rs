//! Frame-driven value animation

mod easing;
mod tween;

pub use easing::Easing;
pub use tween::Tween;
