//! Scalar tweens advanced by frame time

use std::time::Duration;

use super::Easing;

/// Animates one value from `start` to `end` over `duration`
#[derive(Debug, Clone)]
pub struct Tween {
    pub start: f32,
    pub end: f32,
    pub duration: Duration,
    /// Linear progress in `[0, 1]`, before easing
    pub progress: f32,
    pub easing: Easing,
    pub complete: bool,
}

impl Tween {
    /// Linear tween; a zero duration is complete from the start
    pub fn new(start: f32, end: f32, duration: Duration) -> Self {
        let complete = duration.is_zero();
        Self {
            start,
            end,
            duration,
            progress: if complete { 1.0 } else { 0.0 },
            easing: Easing::Linear,
            complete,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Step by `dt` and return the value after the step
    pub fn update(&mut self, dt: Duration) -> f32 {
        if !self.complete {
            self.progress =
                (self.progress + dt.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
            self.complete = self.progress >= 1.0;
        }
        self.value()
    }

    /// Exactly `end` once complete
    pub fn value(&self) -> f32 {
        if self.complete {
            self.end
        } else {
            self.start + (self.end - self.start) * self.easing.apply(self.progress)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_end_after_duration() {
        let mut tween = Tween::new(0.02, 0.0, Duration::from_millis(500))
            .with_easing(Easing::EaseInOutQuad);

        for _ in 0..4 {
            tween.update(Duration::from_millis(100));
        }
        assert!(!tween.complete);
        assert!(tween.value() > 0.0 && tween.value() < 0.02);

        let value = tween.update(Duration::from_millis(150));
        assert!(tween.complete);
        assert_eq!(value, 0.0);

        // Further updates stay at the end
        assert_eq!(tween.update(Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let tween = Tween::new(1.0, 3.0, Duration::ZERO);
        assert!(tween.complete);
        assert_eq!(tween.value(), 3.0);
    }

    #[test]
    fn test_linear_midpoint() {
        let mut tween = Tween::new(0.0, 10.0, Duration::from_secs(2));
        assert!((tween.update(Duration::from_secs(1)) - 5.0).abs() < 1e-5);
    }
}
