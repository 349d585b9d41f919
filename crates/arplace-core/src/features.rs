//! Hit tests against the sparse feature point cloud

use arplace_config::HitTestConfig;
use arplace_spatial::{Ray, Vector3};
use serde::{Deserialize, Serialize};

/// A feature point matched against a ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureHitResult {
    /// The feature projected onto the ray
    pub position: Vector3,
    /// Distance of `position` from the ray origin, never negative
    pub distance_to_ray_origin: f32,
    /// The feature point itself
    pub feature_hit: Vector3,
    /// Perpendicular distance from the feature to the ray
    pub feature_distance_to_hit_result: f32,
}

impl FeatureHitResult {
    fn project(ray: &Ray, feature: Vector3) -> Self {
        let along = ray.project_distance(feature);
        Self {
            position: ray.at(along),
            distance_to_ray_origin: along.abs(),
            feature_hit: feature,
            feature_distance_to_hit_result: ray.distance_to_point(feature),
        }
    }
}

/// Bounds for a cone-constrained feature search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeQuery {
    /// Full opening angle of the cone in degrees
    pub cone_angle_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_results: usize,
}

impl ConeQuery {
    /// Half-angle of the cone in radians, the opening capped at 360°
    pub fn max_angle(&self) -> f32 {
        (self.cone_angle_degrees.min(360.0) / 2.0).to_radians()
    }
}

impl From<&HitTestConfig> for ConeQuery {
    fn from(config: &HitTestConfig) -> Self {
        Self {
            cone_angle_degrees: config.cone_angle_degrees,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            max_results: config.max_results,
        }
    }
}

impl Default for ConeQuery {
    fn default() -> Self {
        Self::from(&HitTestConfig::default())
    }
}

/// Features within the cone around `ray`, nearest to the ray origin first.
///
/// Features whose projection falls outside `[min_distance, max_distance]`
/// or whose direction from the origin deviates from the ray by more than
/// the half-angle are skipped. Equal distances keep scan order.
pub fn hit_test_cone(ray: &Ray, features: &[Vector3], query: &ConeQuery) -> Vec<FeatureHitResult> {
    let max_angle = query.max_angle();

    let mut results: Vec<FeatureHitResult> = features
        .iter()
        .filter_map(|&feature| {
            let hit = FeatureHitResult::project(ray, feature);
            if hit.distance_to_ray_origin < query.min_distance
                || hit.distance_to_ray_origin > query.max_distance
            {
                return None;
            }

            let to_feature = (feature - ray.origin).normalize();
            let cos = ray.direction.dot(&to_feature).clamp(-1.0, 1.0);
            if cos.acos() > max_angle {
                return None;
            }

            Some(hit)
        })
        .collect();

    results.sort_by(|a, b| a.distance_to_ray_origin.total_cmp(&b.distance_to_ray_origin));
    results.truncate(query.max_results);
    results
}

/// The feature closest to the ray's supporting line, with no angle or
/// distance window. The first feature wins ties. `None` for an empty cloud.
pub fn hit_test_nearest(ray: &Ray, features: &[Vector3]) -> Option<FeatureHitResult> {
    let mut nearest: Option<FeatureHitResult> = None;
    for &feature in features {
        let hit = FeatureHitResult::project(ray, feature);
        match nearest {
            Some(best)
                if hit.feature_distance_to_hit_result >= best.feature_distance_to_hit_result => {}
            _ => nearest = Some(hit),
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_ray() -> Ray {
        Ray::new(Vector3::ZERO, Vector3::FORWARD)
    }

    fn query(max_results: usize) -> ConeQuery {
        ConeQuery {
            max_results,
            ..ConeQuery::default()
        }
    }

    #[test]
    fn test_defaults_from_config() {
        let q = ConeQuery::default();
        assert_eq!(q.cone_angle_degrees, 18.0);
        assert_eq!(q.min_distance, 0.2);
        assert_eq!(q.max_distance, 2.0);
        assert_eq!(q.max_results, 1);
        assert!((q.max_angle() - 9.0f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_cone_results_sorted_and_truncated() {
        let features = [
            Vector3::new(0.01, 0.0, 1.5),
            Vector3::new(0.0, 0.02, 0.5),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(-0.01, 0.0, 1.8),
        ];

        let hits = hit_test_cone(&forward_ray(), &features, &query(3));
        assert_eq!(hits.len(), 3);
        assert!(hits
            .windows(2)
            .all(|w| w[0].distance_to_ray_origin <= w[1].distance_to_ray_origin));
        assert_eq!(hits[0].feature_hit, features[1]);

        let single = hit_test_cone(&forward_ray(), &features, &query(1));
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].feature_hit, features[1]);
    }

    #[test]
    fn test_cone_excludes_outside_distance_window() {
        // Dead on the ray, but too near or too far
        let features = [
            Vector3::new(0.0, 0.0, 0.1),
            Vector3::new(0.0, 0.0, 2.5),
            Vector3::new(0.0, 0.0, -1.0),
        ];
        assert!(hit_test_cone(&forward_ray(), &features, &query(10)).is_empty());
    }

    #[test]
    fn test_cone_excludes_wide_angles() {
        // 45° off the ray, inside the distance window
        let features = [Vector3::new(1.0, 0.0, 1.0)];
        assert!(hit_test_cone(&forward_ray(), &features, &query(10)).is_empty());

        let wide = ConeQuery {
            cone_angle_degrees: 120.0,
            ..query(10)
        };
        assert_eq!(hit_test_cone(&forward_ray(), &features, &wide).len(), 1);
    }

    #[test]
    fn test_cone_ties_keep_scan_order() {
        let features = [
            Vector3::new(0.01, 0.0, 1.0),
            Vector3::new(-0.01, 0.0, 1.0),
            Vector3::new(0.0, 0.01, 1.0),
        ];
        let hits = hit_test_cone(&forward_ray(), &features, &query(3));
        let order: Vec<Vector3> = hits.iter().map(|h| h.feature_hit).collect();
        assert_eq!(order, features.to_vec());
    }

    #[test]
    fn test_cone_hit_geometry() {
        let hits = hit_test_cone(&forward_ray(), &[Vector3::new(0.05, 0.0, 1.0)], &query(1));
        let hit = hits[0];
        assert_eq!(hit.position, Vector3::new(0.0, 0.0, 1.0));
        assert!((hit.distance_to_ray_origin - 1.0).abs() < 1e-6);
        assert!((hit.feature_distance_to_hit_result - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_picks_smallest_perpendicular_distance() {
        let features = [
            Vector3::new(2.0, 0.0, 1.0),
            Vector3::new(0.0, 0.3, 9.0),
            Vector3::new(0.0, 0.0, -4.0),
        ];
        let hit = hit_test_nearest(&forward_ray(), &features).unwrap();
        assert_eq!(hit.feature_hit, features[2]);
        assert_eq!(hit.position, Vector3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_nearest_first_minimum_wins() {
        let features = [
            Vector3::new(0.5, 0.0, 1.0),
            Vector3::new(-0.5, 0.0, 3.0),
            Vector3::new(0.0, 0.5, 2.0),
        ];
        let hit = hit_test_nearest(&forward_ray(), &features).unwrap();
        assert_eq!(hit.feature_hit, features[0]);
    }

    #[test]
    fn test_features_behind_origin_report_positive_distance() {
        let hit = hit_test_nearest(&forward_ray(), &[Vector3::new(0.0, 0.1, -1.5)]).unwrap();
        assert_eq!(hit.position, Vector3::new(0.0, 0.0, -1.5));
        assert!((hit.distance_to_ray_origin - 1.5).abs() < 1e-6);

        let full_sphere = ConeQuery {
            cone_angle_degrees: 360.0,
            ..query(10)
        };
        let behind = [Vector3::new(0.3, 0.0, -1.0)];
        let hits = hit_test_cone(&forward_ray(), &behind, &full_sphere);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance_to_ray_origin - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_empty_cloud() {
        assert!(hit_test_nearest(&forward_ray(), &[]).is_none());
    }
}
