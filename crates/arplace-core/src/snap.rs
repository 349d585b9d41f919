//! Settling the selected object onto newly detected planes

use std::time::Duration;

use arplace_config::SnapConfig;
use arplace_spatial::Vector3;
use tracing::trace;

use crate::anchor::PlaneAnchor;
use crate::animation::{Easing, Tween};
use crate::object::ObjectId;

/// Result of checking the selected object against one plane anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapDecision {
    /// No object is selected
    NoSelection,
    /// The object already rests exactly on the plane
    AlreadyOnPlane,
    /// The object is not over the plane's tolerance-expanded footprint
    OutsideFootprint,
    /// The object is over the plane but too far above or below it
    OutsideVerticalBand,
    /// The object should drop to the plane's world height
    Snap { target_y: f32 },
}

impl SnapDecision {
    pub fn is_snap(&self) -> bool {
        matches!(self, SnapDecision::Snap { .. })
    }
}

/// Decides when an object hovering just off a plane should settle onto it
#[derive(Debug, Clone)]
pub struct PlaneSnapEngine {
    extent_tolerance: f32,
    vertical_allowance: f32,
    animation_duration: Duration,
}

impl PlaneSnapEngine {
    pub fn new(config: &SnapConfig) -> Self {
        Self {
            extent_tolerance: config.extent_tolerance,
            vertical_allowance: config.vertical_allowance,
            animation_duration: config.animation_duration(),
        }
    }

    /// Check a world position against a plane anchor
    pub fn evaluate(&self, object_position: Vector3, anchor: &PlaneAnchor) -> SnapDecision {
        let local = anchor.to_local(object_position);

        if local.y == 0.0 {
            return SnapDecision::AlreadyOnPlane;
        }

        if !anchor.contains_local(local, self.extent_tolerance) {
            trace!("Object outside footprint of plane {}", anchor.id);
            return SnapDecision::OutsideFootprint;
        }

        if local.y > -self.vertical_allowance && local.y < self.vertical_allowance {
            SnapDecision::Snap {
                target_y: anchor.world_y(),
            }
        } else {
            SnapDecision::OutsideVerticalBand
        }
    }

    /// Eased animation of a world height towards a plane
    pub fn animation(&self, from_y: f32, to_y: f32) -> Tween {
        Tween::new(from_y, to_y, self.animation_duration).with_easing(Easing::EaseInOutSine)
    }

    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }
}

impl Default for PlaneSnapEngine {
    fn default() -> Self {
        Self::new(&SnapConfig::default())
    }
}

/// A running snap of one object's world Y
#[derive(Debug, Clone)]
pub struct SnapAnimation {
    pub object: ObjectId,
    pub tween: Tween,
}
