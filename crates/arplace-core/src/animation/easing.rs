//! Progress curves for tweens

use std::f32::consts::PI;

/// Maps linear progress in `[0, 1]` onto a curve with the same endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic acceleration then deceleration
    EaseInOutQuad,
    /// Half a cosine period; gentler at both ends than the quadratic
    EaseInOutSine,
}

impl Easing {
    /// Eased progress; input outside `[0, 1]` is clamped
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutQuad if t < 0.5 => 2.0 * t * t,
            Easing::EaseInOutQuad => 1.0 - 2.0 * (1.0 - t) * (1.0 - t),
            Easing::EaseInOutSine => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}
