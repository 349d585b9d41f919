//! Unit quaternions for orientation

use super::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Orientation as a unit quaternion `(x, y, z, w)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis` (right-handed)
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let axis = axis.normalize();
        let (sin, cos) = (angle / 2.0).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Rotation that first pitches about +X, then yaws about +Y.
    ///
    /// A positive pitch tilts the forward axis downward.
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        Self::from_axis_angle(Vector3::UP, yaw) * Self::from_axis_angle(Vector3::RIGHT, pitch)
    }

    /// The opposite rotation; only valid for unit quaternions
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        let axis = Vector3::new(self.x, self.y, self.z);
        let t = axis.cross(&v) * 2.0;
        v + t * self.w + axis.cross(&t)
    }

    /// Heading about the vertical axis in radians, in `(-PI, PI]`
    pub fn yaw(&self) -> f32 {
        let siny = 2.0 * (self.w * self.y + self.x * self.z);
        let cosy = 1.0 - 2.0 * (self.x * self.x + self.y * self.y);
        siny.atan2(cosy)
    }

    /// Where the rotated +Z axis points
    pub fn forward(&self) -> Vector3 {
        self.rotate_vector(Vector3::FORWARD)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Hamilton product: `a * b` applies `b` first
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, b: Self) -> Self::Output {
        let a = self;
        Quaternion::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}
