//! arplace-spatial: spatial primitives for AR object placement
//!
//! Uses a right-handed coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)
//!
//! Positions and directions share the [`Vector3`] type, matching the way
//! tracking layers report feature points and anchor positions.

mod quaternion;
mod ray;
mod rolling;
mod transform;
mod vector3;

pub use quaternion::Quaternion;
pub use ray::Ray;
pub use rolling::RollingAverage;
pub use transform::Transform;
pub use vector3::Vector3;
