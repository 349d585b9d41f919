//! Rigid placement of a frame in world space

use super::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Position, orientation and per-axis scale of a local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3,
    pub rotation: Quaternion,
    pub scale: Vector3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
        }
    }

    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn from_position_rotation(position: Vector3, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            ..Self::identity()
        }
    }

    /// Frame at `position` whose +Z axis points at `target`, with no roll.
    ///
    /// A target at `position` leaves the identity orientation.
    pub fn looking_at(position: Vector3, target: Vector3) -> Self {
        let offset = target - position;
        if offset.length_squared() < 1e-8 {
            return Self::from_position(position);
        }

        let direction = offset.normalize();
        let yaw = direction.x.atan2(direction.z);
        let pitch = (-direction.y).clamp(-1.0, 1.0).asin();
        Self::from_position_rotation(position, Quaternion::from_yaw_pitch(yaw, pitch))
    }

    /// World direction of the local +Z axis
    pub fn forward(&self) -> Vector3 {
        self.rotation.forward()
    }

    /// Local point to world
    pub fn transform_point(&self, local: Vector3) -> Vector3 {
        self.position + self.rotation.rotate_vector(local * self.scale)
    }

    /// World point to local
    pub fn inverse_transform_point(&self, world: Vector3) -> Vector3 {
        let local = self.rotation.conjugate().rotate_vector(world - self.position);
        Vector3::new(
            local.x / self.scale.x,
            local.y / self.scale.y,
            local.z / self.scale.z,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
