//! Detected horizontal surfaces reported by the tracking layer

use arplace_spatial::{Ray, Transform, Vector3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::raycast::intersect_horizontal_plane;

/// Rectangular size of a plane in its local X/Z axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneExtent {
    pub width: f32,
    pub depth: f32,
}

impl PlaneExtent {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }
}

/// A tracked horizontal surface.
///
/// The surface lies on `y = 0` of the anchor's local frame. `center` is in
/// that local frame; the rectangle spans `extent` around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneAnchor {
    pub id: Uuid,
    pub transform: Transform,
    pub center: Vector3,
    pub extent: PlaneExtent,
}

impl PlaneAnchor {
    /// Anchor at `position` with its center at the local origin
    pub fn new(position: Vector3, extent: PlaneExtent) -> Self {
        Self {
            id: Uuid::new_v4(),
            transform: Transform::from_position(position),
            center: Vector3::ZERO,
            extent,
        }
    }

    /// Height of the surface in world space
    pub fn world_y(&self) -> f32 {
        self.transform.position.y
    }

    /// Express a world point in the anchor's local frame
    pub fn to_local(&self, world: Vector3) -> Vector3 {
        self.transform.inverse_transform_point(world)
    }

    /// Whether a local X/Z lies inside the extent grown by `tolerance`
    /// (a fraction of the extent) on every side
    pub fn contains_local(&self, local: Vector3, tolerance: f32) -> bool {
        let half_x = self.extent.width / 2.0 + self.extent.width * tolerance;
        let half_z = self.extent.depth / 2.0 + self.extent.depth * tolerance;

        local.x >= self.center.x - half_x
            && local.x <= self.center.x + half_x
            && local.z >= self.center.z - half_z
            && local.z <= self.center.z + half_z
    }

    /// Where `ray` meets the bounded surface, if it does
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vector3> {
        let hit = intersect_horizontal_plane(ray, self.world_y())?;
        self.contains_local(self.to_local(hit), 0.0).then_some(hit)
    }
}

/// One ranked result of the tracking layer's existing-plane hit test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneHit {
    pub world_position: Vector3,
    pub anchor: Option<PlaneAnchor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> PlaneAnchor {
        PlaneAnchor::new(Vector3::new(1.0, 0.5, 1.0), PlaneExtent::new(2.0, 2.0))
    }

    #[test]
    fn test_to_local() {
        let local = floor().to_local(Vector3::new(1.5, 0.52, 0.0));
        assert!((local.x - 0.5).abs() < 1e-6);
        assert!((local.y - 0.02).abs() < 1e-6);
        assert!((local.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains_with_tolerance() {
        let anchor = floor();
        assert!(anchor.contains_local(Vector3::new(1.0, 0.0, 1.0), 0.0));
        assert!(!anchor.contains_local(Vector3::new(1.1, 0.0, 0.0), 0.0));
        assert!(anchor.contains_local(Vector3::new(1.1, 0.0, 0.0), 0.1));
        assert!(anchor.contains_local(Vector3::new(-1.19, 0.0, 1.19), 0.1));
        assert!(!anchor.contains_local(Vector3::new(1.25, 0.0, 0.0), 0.1));
    }

    #[test]
    fn test_offset_center() {
        let mut anchor = floor();
        anchor.center = Vector3::new(3.0, 0.0, 0.0);
        assert!(anchor.contains_local(Vector3::new(3.9, 0.0, 0.0), 0.0));
        assert!(!anchor.contains_local(Vector3::ZERO, 0.0));
    }

    #[test]
    fn test_intersect_ray_respects_bounds() {
        let anchor = floor();
        let inside = Ray::new(Vector3::new(1.0, 2.0, 1.0), Vector3::DOWN);
        let hit = anchor.intersect_ray(&inside).unwrap();
        assert!((hit.y - 0.5).abs() < 1e-6);

        let outside = Ray::new(Vector3::new(5.0, 2.0, 1.0), Vector3::DOWN);
        assert!(anchor.intersect_ray(&outside).is_none());
    }
}
