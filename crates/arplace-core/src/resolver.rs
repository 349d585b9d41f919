//! Screen point to world position: the fallback cascade.
//!
//! Tiers, most trusted first:
//! 1. existing plane geometry from the tracking layer
//! 2. a feature point inside a narrow cone around the touch ray
//! 3. an unbounded horizontal plane at the previous object height
//! 4. the cone feature from tier 2, when tier 3 was skipped or missed
//! 5. the feature nearest to the ray, unconstrained
//!
//! The resolver holds configuration only; every call reads the current
//! frame through the [`TrackingSource`].

use arplace_config::PlacementConfig;
use arplace_spatial::Vector3;
use serde::Serialize;
use tracing::trace;

use crate::anchor::PlaneAnchor;
use crate::camera::{ScreenPoint, Viewport};
use crate::features::{hit_test_cone, hit_test_nearest, ConeQuery};
use crate::raycast::{hit_test_infinite_plane, screen_point_to_ray};
use crate::source::TrackingSource;

/// Which tier of the cascade produced a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlacementTier {
    ExistingPlane,
    FeatureCone,
    InfinitePlane,
    NearestFeature,
}

/// Outcome of resolving a screen point
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    pub position: Option<Vector3>,
    pub plane_anchor: Option<PlaneAnchor>,
    pub hit_a_plane: bool,
    pub tier: Option<PlacementTier>,
}

impl PlacementResult {
    /// No tier produced a position
    pub fn none() -> Self {
        Self {
            position: None,
            plane_anchor: None,
            hit_a_plane: false,
            tier: None,
        }
    }

    fn found(
        position: Vector3,
        plane_anchor: Option<PlaneAnchor>,
        hit_a_plane: bool,
        tier: PlacementTier,
    ) -> Self {
        Self {
            position: Some(position),
            plane_anchor,
            hit_a_plane,
            tier: Some(tier),
        }
    }

    pub fn is_none(&self) -> bool {
        self.position.is_none()
    }
}

/// Resolves screen points to world positions
#[derive(Debug, Clone)]
pub struct PlacementResolver {
    cone: ConeQuery,
    min_downward_ray_y: f32,
    drag_on_infinite_planes: bool,
}

impl PlacementResolver {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            cone: ConeQuery::from(&config.hit_test),
            min_downward_ray_y: config.hit_test.min_downward_ray_y,
            drag_on_infinite_planes: config.gesture.drag_on_infinite_planes,
        }
    }

    /// Allow drags to move objects along unbounded planes
    pub fn set_drag_on_infinite_planes(&mut self, enabled: bool) {
        self.drag_on_infinite_planes = enabled;
    }

    pub fn drag_on_infinite_planes(&self) -> bool {
        self.drag_on_infinite_planes
    }

    /// Resolve `point` against the current frame.
    ///
    /// `previous_position` sets the height of the unbounded plane (origin
    /// height when absent). `allow_infinite_plane` requests that plane even
    /// when a cone feature was found; it only takes effect with dragging on
    /// infinite planes enabled.
    pub fn resolve<S: TrackingSource + ?Sized>(
        &self,
        source: &S,
        viewport: Viewport,
        point: ScreenPoint,
        previous_position: Option<Vector3>,
        allow_infinite_plane: bool,
    ) -> PlacementResult {
        let Some(camera) = source.current_camera_pose() else {
            trace!("No camera pose, cannot resolve ({}, {})", point.x, point.y);
            return PlacementResult::none();
        };

        // 1. Existing planes
        if let Some(hit) = source.hit_test_existing_planes(point, viewport).into_iter().next() {
            trace!("Resolved on existing plane at {:?}", hit.world_position);
            return PlacementResult::found(
                hit.world_position,
                hit.anchor,
                true,
                PlacementTier::ExistingPlane,
            );
        }

        let Some(ray) = screen_point_to_ray(point, Some(&camera), viewport) else {
            trace!("Viewport is empty, cannot build a ray");
            return PlacementResult::none();
        };
        let features = source.raw_feature_points();

        // 2. Cone feature, held back
        let cone_hit = hit_test_cone(&ray, &features, &self.cone)
            .first()
            .map(|hit| hit.position);
        trace!("Cone feature hit: {:?}", cone_hit);

        // 3. Unbounded plane
        if (allow_infinite_plane && self.drag_on_infinite_planes) || cone_hit.is_none() {
            let point_on_plane = previous_position.unwrap_or(Vector3::ZERO);
            if let Some(position) =
                hit_test_infinite_plane(&ray, point_on_plane, self.min_downward_ray_y)
            {
                trace!("Resolved on infinite plane y={} at {:?}", point_on_plane.y, position);
                return PlacementResult::found(position, None, true, PlacementTier::InfinitePlane);
            }
        }

        // 4. Cone feature
        if let Some(position) = cone_hit {
            return PlacementResult::found(position, None, false, PlacementTier::FeatureCone);
        }

        // 5. Nearest feature
        if let Some(hit) = hit_test_nearest(&ray, &features) {
            trace!("Resolved on nearest feature {:?}", hit.feature_hit);
            return PlacementResult::found(
                hit.position,
                None,
                false,
                PlacementTier::NearestFeature,
            );
        }

        trace!("No placement tier matched");
        PlacementResult::none()
    }
}

impl Default for PlacementResolver {
    fn default() -> Self {
        Self::new(&PlacementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{PlaneExtent, PlaneHit};
    use crate::camera::{CameraPose, Projection};

    struct FakeSource {
        camera: Option<CameraPose>,
        features: Vec<Vector3>,
        planes: Vec<PlaneHit>,
    }

    impl FakeSource {
        /// Camera at (0, 1, 0) looking forward and down at 45°
        fn tilted() -> Self {
            Self {
                camera: Some(CameraPose::looking_at(
                    Vector3::new(0.0, 1.0, 0.0),
                    Vector3::new(0.0, 0.0, 1.0),
                    Projection::perspective(60.0),
                )),
                features: Vec::new(),
                planes: Vec::new(),
            }
        }

        /// Camera at (0, 1, 0) looking at the horizon
        fn level() -> Self {
            Self {
                camera: Some(CameraPose::looking_at(
                    Vector3::new(0.0, 1.0, 0.0),
                    Vector3::new(0.0, 1.0, 1.0),
                    Projection::perspective(60.0),
                )),
                features: Vec::new(),
                planes: Vec::new(),
            }
        }
    }

    impl TrackingSource for FakeSource {
        fn current_camera_pose(&self) -> Option<CameraPose> {
            self.camera
        }

        fn raw_feature_points(&self) -> Vec<Vector3> {
            self.features.clone()
        }

        fn hit_test_existing_planes(&self, _: ScreenPoint, _: Viewport) -> Vec<PlaneHit> {
            self.planes.clone()
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(400.0, 300.0)
    }

    fn resolve(source: &FakeSource, allow_infinite: bool) -> PlacementResult {
        PlacementResolver::default().resolve(
            source,
            viewport(),
            viewport().center(),
            None,
            allow_infinite,
        )
    }

    #[test]
    fn test_no_camera_resolves_nothing() {
        let source = FakeSource {
            camera: None,
            features: vec![Vector3::ZERO],
            planes: Vec::new(),
        };
        assert_eq!(resolve(&source, false), PlacementResult::none());
    }

    #[test]
    fn test_existing_plane_beats_cone_feature() {
        let anchor = PlaneAnchor::new(Vector3::new(0.0, 0.0, 1.0), PlaneExtent::new(1.0, 1.0));
        let mut source = FakeSource::tilted();
        // On the center ray, 1 m from the camera
        source.features = vec![Vector3::new(0.0, 1.0 - 0.7071, 0.7071)];
        source.planes = vec![
            PlaneHit {
                world_position: Vector3::new(0.0, 0.0, 1.0),
                anchor: Some(anchor.clone()),
            },
            PlaneHit {
                world_position: Vector3::new(0.0, -1.0, 2.0),
                anchor: None,
            },
        ];

        let result = resolve(&source, false);
        assert_eq!(result.position, Some(Vector3::new(0.0, 0.0, 1.0)));
        assert_eq!(result.plane_anchor, Some(anchor));
        assert!(result.hit_a_plane);
        assert_eq!(result.tier, Some(PlacementTier::ExistingPlane));
    }

    #[test]
    fn test_cone_feature_beats_infinite_plane() {
        let mut source = FakeSource::tilted();
        source.features = vec![Vector3::new(0.0, 1.0 - 0.7071, 0.7071)];

        let result = resolve(&source, false);
        assert_eq!(result.tier, Some(PlacementTier::FeatureCone));
        assert!(!result.hit_a_plane);
        assert!(result.plane_anchor.is_none());
    }

    #[test]
    fn test_infinite_plane_when_no_cone_feature() {
        let source = FakeSource::tilted();
        let result = resolve(&source, false);

        assert_eq!(result.tier, Some(PlacementTier::InfinitePlane));
        assert!(result.hit_a_plane);
        let position = result.position.unwrap();
        assert!(position.y.abs() < 1e-4);
        assert!((position.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_infinite_plane_uses_previous_height() {
        let source = FakeSource::tilted();
        let result = PlacementResolver::default().resolve(
            &source,
            viewport(),
            viewport().center(),
            Some(Vector3::new(3.0, 0.5, 3.0)),
            false,
        );
        let position = result.position.unwrap();
        assert!((position.y - 0.5).abs() < 1e-4);
        assert!((position.z - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_drag_on_infinite_planes_overrides_cone() {
        let mut source = FakeSource::tilted();
        source.features = vec![Vector3::new(0.0, 1.0 - 0.7071, 0.7071)];

        let mut resolver = PlacementResolver::default();
        let point = viewport().center();

        // Requested but disabled
        let result = resolver.resolve(&source, viewport(), point, None, true);
        assert_eq!(result.tier, Some(PlacementTier::FeatureCone));

        resolver.set_drag_on_infinite_planes(true);
        let result = resolver.resolve(&source, viewport(), point, None, true);
        assert_eq!(result.tier, Some(PlacementTier::InfinitePlane));

        // Enabled but not requested
        let result = resolver.resolve(&source, viewport(), point, None, false);
        assert_eq!(result.tier, Some(PlacementTier::FeatureCone));
    }

    #[test]
    fn test_nearest_feature_fallback_on_level_ray() {
        let mut source = FakeSource::level();
        // Far outside the cone window
        source.features = vec![Vector3::new(0.3, 1.0, 5.0), Vector3::new(0.1, 1.0, 8.0)];

        let result = resolve(&source, false);
        assert_eq!(result.tier, Some(PlacementTier::NearestFeature));
        assert!(!result.hit_a_plane);
        let position = result.position.unwrap();
        assert!((position.z - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_level_ray_without_features_resolves_nothing() {
        let result = resolve(&FakeSource::level(), false);
        assert!(result.is_none());
        assert!(!result.hit_a_plane);
    }
}
