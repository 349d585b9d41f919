//! The tracking layer as seen by the placement core

use arplace_spatial::Vector3;

use crate::anchor::PlaneHit;
use crate::camera::{CameraPose, ScreenPoint, Viewport};

/// World data supplied by the host's tracking session.
///
/// Implementations answer from their latest frame; the core never mutates
/// what it reads through this trait.
pub trait TrackingSource {
    /// Camera pose for the current frame, `None` before tracking starts
    fn current_camera_pose(&self) -> Option<CameraPose>;

    /// The sparse feature cloud for the current frame, possibly empty
    fn raw_feature_points(&self) -> Vec<Vector3>;

    /// Hits against already detected planes, nearest to the viewer first
    fn hit_test_existing_planes(&self, point: ScreenPoint, viewport: Viewport) -> Vec<PlaneHit>;
}

impl<T: TrackingSource + ?Sized> TrackingSource for &T {
    fn current_camera_pose(&self) -> Option<CameraPose> {
        (**self).current_camera_pose()
    }

    fn raw_feature_points(&self) -> Vec<Vector3> {
        (**self).raw_feature_points()
    }

    fn hit_test_existing_planes(&self, point: ScreenPoint, viewport: Viewport) -> Vec<PlaneHit> {
        (**self).hit_test_existing_planes(point, viewport)
    }
}
