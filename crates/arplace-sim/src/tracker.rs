//! In-memory tracking source backed by a scene description

use std::collections::HashMap;

use arplace_core::raycast::screen_point_to_ray;
use arplace_core::{CameraPose, PlaneAnchor, PlaneHit, ScreenPoint, TrackingSource, Viewport};
use arplace_spatial::{Transform, Vector3};
use tracing::debug;

use crate::scene::ScenePlane;

/// Tracker state the simulation mutates frame by frame
#[derive(Debug, Default)]
pub struct SceneTracker {
    camera: Option<CameraPose>,
    features: Vec<Vector3>,
    planes: Vec<PlaneAnchor>,
    /// Plane name to index in `planes`
    names: HashMap<String, usize>,
}

impl SceneTracker {
    pub fn new(features: Vec<Vector3>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    pub fn set_camera(&mut self, camera: Option<CameraPose>) {
        self.camera = camera;
    }

    pub fn planes(&self) -> &[PlaneAnchor] {
        &self.planes
    }

    /// Detect a plane, or refine the one detected earlier under the same
    /// name. Returns the anchor as it now stands.
    pub fn reveal_plane(&mut self, plane: &ScenePlane) -> PlaneAnchor {
        if let Some(&index) = self.names.get(&plane.name) {
            if let Some(anchor) = self.planes.get_mut(index) {
                anchor.transform = Transform::from_position(plane.position);
                anchor.extent = plane.extent;
                debug!("Updated plane {} ({})", plane.name, anchor.id);
                return anchor.clone();
            }
        }

        let anchor = PlaneAnchor::new(plane.position, plane.extent);
        debug!("Detected plane {} ({})", plane.name, anchor.id);
        self.names.insert(plane.name.clone(), self.planes.len());
        self.planes.push(anchor.clone());
        anchor
    }

    /// Forget every plane, as a restarted tracking session would
    pub fn clear_planes(&mut self) {
        self.planes.clear();
        self.names.clear();
    }
}

impl TrackingSource for SceneTracker {
    fn current_camera_pose(&self) -> Option<CameraPose> {
        self.camera
    }

    fn raw_feature_points(&self) -> Vec<Vector3> {
        self.features.clone()
    }

    fn hit_test_existing_planes(&self, point: ScreenPoint, viewport: Viewport) -> Vec<PlaneHit> {
        let Some(ray) = screen_point_to_ray(point, self.camera.as_ref(), viewport) else {
            return Vec::new();
        };

        let mut hits: Vec<(f32, PlaneHit)> = self
            .planes
            .iter()
            .filter_map(|anchor| {
                let world_position = anchor.intersect_ray(&ray)?;
                Some((
                    world_position.distance(&ray.origin),
                    PlaneHit {
                        world_position,
                        anchor: Some(anchor.clone()),
                    },
                ))
            })
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, hit)| hit).collect()
    }
}
