//! Screen-to-world rays and ray/horizontal-plane intersection

use arplace_spatial::{Ray, Vector3};

use crate::camera::{CameraPose, ScreenPoint, Viewport};

/// World ray from the camera through a screen point.
///
/// The screen point is unprojected onto the far clipping plane; the ray
/// starts at the camera position. `None` when tracking has not produced a
/// camera pose yet or the viewport is empty.
pub fn screen_point_to_ray(
    point: ScreenPoint,
    camera: Option<&CameraPose>,
    viewport: Viewport,
) -> Option<Ray> {
    let camera = camera?;
    let far_point = camera.unproject_far(point, viewport)?;
    let origin = camera.position();
    Some(Ray::new(origin, far_point - origin))
}

/// Intersection of a ray with the horizontal plane `y = plane_y`.
///
/// A horizontal ray lying in the plane intersects everywhere and yields its
/// origin. Parallel rays off the plane and intersections behind the origin
/// yield `None`.
pub fn intersect_horizontal_plane(ray: &Ray, plane_y: f32) -> Option<Vector3> {
    let direction = ray.direction.normalize();

    if direction.y == 0.0 {
        return (ray.origin.y == plane_y).then_some(ray.origin);
    }

    let t = (plane_y - ray.origin.y) / direction.y;
    if t < 0.0 {
        return None;
    }

    Some(ray.origin + direction * t)
}

/// Hit test against an unbounded horizontal plane through `point_on_plane`.
///
/// Rays that are not pointing down by more than `min_downward_ray_y` are
/// rejected: near-horizontal rays meet the plane arbitrarily far away.
pub fn hit_test_infinite_plane(
    ray: &Ray,
    point_on_plane: Vector3,
    min_downward_ray_y: f32,
) -> Option<Vector3> {
    if ray.direction.y > min_downward_ray_y {
        return None;
    }
    intersect_horizontal_plane(ray, point_on_plane.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;

    #[test]
    fn test_straight_down_hits_floor() {
        let ray = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::DOWN);
        assert_eq!(
            intersect_horizontal_plane(&ray, 0.0),
            Some(Vector3::new(0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_horizontal_ray_in_plane_returns_origin() {
        for origin in [
            Vector3::new(0.0, 0.5, 0.0),
            Vector3::new(-3.0, 0.5, 7.0),
            Vector3::new(12.0, 0.5, -1.0),
        ] {
            let ray = Ray::new(origin, Vector3::new(1.0, 0.0, 1.0));
            assert_eq!(intersect_horizontal_plane(&ray, 0.5), Some(origin));
        }
    }

    #[test]
    fn test_horizontal_ray_off_plane_misses() {
        for plane_y in [-1.0, 0.0, 0.49, 2.0] {
            let ray = Ray::new(Vector3::new(0.0, 0.5, 0.0), Vector3::FORWARD);
            assert_eq!(intersect_horizontal_plane(&ray, plane_y), None);
        }
    }

    #[test]
    fn test_intersection_behind_origin_is_rejected() {
        // Plane above a downward ray
        let ray = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, -1.0, 1.0));
        assert_eq!(intersect_horizontal_plane(&ray, 2.0), None);

        // Plane below an upward ray
        let ray = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.3, 0.5, 1.0));
        assert_eq!(intersect_horizontal_plane(&ray, 0.0), None);
    }

    #[test]
    fn test_slanted_ray() {
        let ray = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, -1.0, 1.0));
        let hit = intersect_horizontal_plane(&ray, 0.0).unwrap();
        assert!(hit.y.abs() < 0.0001);
        assert!((hit.z - 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_infinite_plane_rejects_shallow_rays() {
        let shallow = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, -0.02, 1.0));
        assert_eq!(hit_test_infinite_plane(&shallow, Vector3::ZERO, -0.03), None);

        let steep = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, -1.0, 1.0));
        let hit = hit_test_infinite_plane(&steep, Vector3::new(5.0, 0.25, 5.0), -0.03).unwrap();
        assert!((hit.y - 0.25).abs() < 0.0001);
    }

    #[test]
    fn test_screen_point_to_ray_requires_camera() {
        let viewport = Viewport::new(400.0, 300.0);
        assert!(screen_point_to_ray(viewport.center(), None, viewport).is_none());
    }

    #[test]
    fn test_screen_center_follows_camera_forward() {
        let viewport = Viewport::new(400.0, 300.0);
        let camera = CameraPose::looking_at(
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::ZERO,
            Projection::perspective(60.0),
        );

        let ray = screen_point_to_ray(viewport.center(), Some(&camera), viewport).unwrap();
        assert_eq!(ray.origin, Vector3::new(0.0, 1.0, 0.0));
        assert!((ray.direction - Vector3::DOWN).length() < 0.0001);

        let hit = intersect_horizontal_plane(&ray, 0.0).unwrap();
        assert!(hit.length() < 0.0001);
    }
}
