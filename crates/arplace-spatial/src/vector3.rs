//! 3D vector used for positions, offsets and directions

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// World-space point or direction, in metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Also the world origin
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    /// Camera forward in the camera's own frame
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Unit-length copy; the zero vector stays zero
    pub fn normalize(&self) -> Self {
        match self.length() {
            len if len == 0.0 => *self,
            len => *self / len,
        }
    }

    /// Keep the direction, change the length. No-op on the zero vector.
    pub fn set_length(&mut self, length: f32) {
        *self = self.normalize() * length;
    }

    /// Copy no longer than `max_length`
    pub fn clamp_length(&self, max_length: f32) -> Self {
        if self.length() > max_length {
            self.normalize() * max_length
        } else {
            *self
        }
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product
    pub fn cross(&self, o: &Vector3) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    pub fn distance(&self, other: &Vector3) -> f32 {
        (*self - *other).length()
    }

    /// `self` at `t = 0`, `other` at `t = 1`
    pub fn lerp(&self, other: &Vector3, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, o: Self) -> Self::Output {
        Vector3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, o: Self) -> Self::Output {
        Vector3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, s: f32) -> Self::Output {
        Vector3::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Component-wise product
impl Mul<Vector3> for Vector3 {
    type Output = Vector3;

    fn mul(self, o: Vector3) -> Self::Output {
        Vector3::new(self.x * o.x, self.y * o.y, self.z * o.z)
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;

    fn div(self, s: f32) -> Self::Output {
        Vector3::new(self.x / s, self.y / s, self.z / s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        assert!((Vector3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = Vector3::new(0.0, -7.0, 0.0).normalize();
        assert_eq!(n, Vector3::DOWN);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let n = Vector3::ZERO.normalize();
        assert_eq!(n, Vector3::ZERO);
        assert!(!n.x.is_nan());

        let mut v = Vector3::ZERO;
        v.set_length(4.0);
        assert_eq!(v, Vector3::ZERO);
    }

    #[test]
    fn test_clamp_length() {
        let clamped = Vector3::new(0.0, 0.0, 25.0).clamp_length(10.0);
        assert!((clamped.length() - 10.0).abs() < 0.0001);
        assert!((clamped.z - 10.0).abs() < 0.0001);

        let short = Vector3::new(1.0, 2.0, 2.0);
        assert_eq!(short.clamp_length(10.0), short);
    }

    #[test]
    fn test_set_length() {
        let mut v = Vector3::new(0.0, 3.0, 4.0);
        v.set_length(10.0);
        assert!((v.y - 6.0).abs() < 0.0001);
        assert!((v.z - 8.0).abs() < 0.0001);
    }

    #[test]
    fn test_cross_follows_right_hand() {
        assert_eq!(Vector3::RIGHT.cross(&Vector3::UP), Vector3::FORWARD);
        assert_eq!(Vector3::RIGHT.dot(&Vector3::UP), 0.0);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Vector3::ZERO.lerp(&Vector3::new(2.0, 4.0, 6.0), 0.5);
        assert_eq!(mid, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_serde_shape() {
        let v: Vector3 = serde_json::from_str(r#"{"x":1.0,"y":2.0,"z":3.0}"#).unwrap();
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }
}
