//! Half-line in world space, `r(t) = origin + t * direction`

use super::Vector3;
use serde::{Deserialize, Serialize};

/// A ray with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Signed distance along the ray of the point's orthogonal projection
    pub fn project_distance(&self, point: Vector3) -> f32 {
        self.direction.dot(&(point - self.origin))
    }

    /// Closest point on the ray's supporting line to `point`
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        self.at(self.project_distance(point))
    }

    /// Perpendicular distance from `point` to the ray's supporting line
    pub fn distance_to_point(&self, point: Vector3) -> f32 {
        (point - self.origin).cross(&self.direction).length()
    }
}
