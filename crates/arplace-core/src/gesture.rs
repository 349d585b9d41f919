//! Single-finger drag of the selected object

use serde::{Deserialize, Serialize};

use crate::camera::ScreenPoint;

/// Phase of a touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// One touch sample from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: ScreenPoint,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, point: ScreenPoint) -> Self {
        Self { phase, point }
    }
}

/// A drag in progress.
///
/// Nothing moves until the finger has travelled `threshold` points from
/// where it went down. At that moment the offset between the finger and
/// the object's on-screen position is captured, so the object keeps its
/// place under the finger instead of jumping to it.
#[derive(Debug, Clone)]
pub struct DragGesture {
    initial: ScreenPoint,
    latest: ScreenPoint,
    threshold: f32,
    drag_offset: Option<(f32, f32)>,
}

impl DragGesture {
    pub fn begin(touch: ScreenPoint, threshold: f32) -> Self {
        Self {
            initial: touch,
            latest: touch,
            threshold,
            drag_offset: None,
        }
    }

    /// Feed a new finger position.
    ///
    /// `object_screen` is the object's current projection, used only when
    /// the threshold is first crossed. Returns the screen point the object
    /// should be resolved at, or `None` while still under the threshold.
    pub fn update(&mut self, touch: ScreenPoint, object_screen: Option<ScreenPoint>) -> Option<ScreenPoint> {
        self.latest = touch;

        if self.drag_offset.is_none() {
            if touch.distance(&self.initial) < self.threshold {
                return None;
            }
            let offset = object_screen
                .map(|object| touch.offset_from(&object))
                .unwrap_or((0.0, 0.0));
            self.drag_offset = Some(offset);
        }

        self.drag_offset.map(|offset| touch.minus_offset(offset))
    }

    pub fn is_translating(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn initial(&self) -> ScreenPoint {
        self.initial
    }

    pub fn latest(&self) -> ScreenPoint {
        self.latest
    }
}
