//! Camera pose snapshot and perspective projection between screen and world

use arplace_spatial::{Transform, Vector3};
use serde::{Deserialize, Serialize};

/// A point on screen, origin top-left, Y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Distance to another screen point
    pub fn distance(&self, other: &ScreenPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise difference `self - other`
    pub fn offset_from(&self, other: &ScreenPoint) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }

    /// Point shifted by `-offset`
    pub fn minus_offset(&self, offset: (f32, f32)) -> ScreenPoint {
        ScreenPoint::new(self.x - offset.0, self.y - offset.1)
    }
}

/// Size of the drawable area in screen points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Middle of the viewport
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Perspective projection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Projection {
    /// Create a perspective projection with a vertical field of view
    pub fn perspective(fov_degrees: f32) -> Self {
        Self {
            fov: fov_degrees.to_radians(),
            near: 0.001,
            far: 1000.0,
        }
    }

    /// Project a camera-space point to normalized device coordinates (-1 to 1)
    fn local_to_ndc(&self, local: Vector3, aspect: f32) -> Option<(f32, f32)> {
        if local.z <= self.near || local.z >= self.far {
            return None;
        }

        let tan_half_fov = (self.fov / 2.0).tan();
        let x_ndc = local.x / (local.z * tan_half_fov * aspect);
        let y_ndc = local.y / (local.z * tan_half_fov);

        if x_ndc.abs() > 1.0 || y_ndc.abs() > 1.0 {
            return None;
        }

        Some((x_ndc, y_ndc))
    }

    /// Camera-space point on the far clipping plane behind a screen point
    fn screen_to_far_plane(&self, point: ScreenPoint, viewport: Viewport) -> Vector3 {
        let x_ndc = point.x / viewport.width * 2.0 - 1.0;
        let y_ndc = 1.0 - point.y / viewport.height * 2.0;

        let tan_half_fov = (self.fov / 2.0).tan();
        Vector3::new(
            x_ndc * tan_half_fov * viewport.aspect() * self.far,
            y_ndc * tan_half_fov * self.far,
            self.far,
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(60.0)
    }
}

/// World-space camera snapshot for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub transform: Transform,
    pub projection: Projection,
}

impl CameraPose {
    pub fn new(transform: Transform, projection: Projection) -> Self {
        Self {
            transform,
            projection,
        }
    }

    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vector3, target: Vector3, projection: Projection) -> Self {
        Self::new(Transform::looking_at(position, target), projection)
    }

    /// Camera position in world space
    pub fn position(&self) -> Vector3 {
        self.transform.position
    }

    /// World position on the far clipping plane under a screen point
    pub fn unproject_far(&self, point: ScreenPoint, viewport: Viewport) -> Option<Vector3> {
        if viewport.is_empty() {
            return None;
        }
        let local = self.projection.screen_to_far_plane(point, viewport);
        Some(self.transform.transform_point(local))
    }

    /// Screen position of a world point, `None` outside the view frustum
    pub fn project(&self, world: Vector3, viewport: Viewport) -> Option<ScreenPoint> {
        if viewport.is_empty() {
            return None;
        }
        let local = self.transform.inverse_transform_point(world);
        let (x_ndc, y_ndc) = self.projection.local_to_ndc(local, viewport.aspect())?;

        Some(ScreenPoint::new(
            (x_ndc + 1.0) / 2.0 * viewport.width,
            (1.0 - y_ndc) / 2.0 * viewport.height,
        ))
    }

    /// Check if a world point is inside the view frustum
    pub fn is_visible(&self, world: Vector3, viewport: Viewport) -> bool {
        self.project(world, viewport).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_camera() -> CameraPose {
        CameraPose::new(Transform::identity(), Projection::perspective(90.0))
    }

    #[test]
    fn test_center_projects_to_viewport_center() {
        let viewport = Viewport::new(800.0, 600.0);
        let screen = forward_camera()
            .project(Vector3::new(0.0, 0.0, 5.0), viewport)
            .unwrap();

        assert!((screen.x - 400.0).abs() < 0.001);
        assert!((screen.y - 300.0).abs() < 0.001);
    }

    #[test]
    fn test_behind_camera() {
        let viewport = Viewport::new(800.0, 600.0);
        assert!(!forward_camera().is_visible(Vector3::new(0.0, 0.0, -5.0), viewport));
    }

    #[test]
    fn test_unproject_round_trip() {
        let viewport = Viewport::new(400.0, 300.0);
        let camera = CameraPose::looking_at(
            Vector3::new(0.0, 1.5, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Projection::perspective(60.0),
        );
        let screen = ScreenPoint::new(120.0, 200.0);

        let far = camera.unproject_far(screen, viewport).unwrap();
        // Any point along the camera→far ray projects back to the same pixel
        let along = camera.position().lerp(&far, 0.001);
        let back = camera.project(along, viewport).unwrap();

        assert!((back.x - screen.x).abs() < 0.05);
        assert!((back.y - screen.y).abs() < 0.05);
    }

    #[test]
    fn test_screen_y_grows_downward() {
        let viewport = Viewport::new(100.0, 100.0);
        let camera = forward_camera();
        let above = camera.project(Vector3::new(0.0, 1.0, 5.0), viewport).unwrap();
        assert!(above.y < 50.0);
    }

    #[test]
    fn test_empty_viewport() {
        let viewport = Viewport::new(0.0, 600.0);
        assert!(viewport.is_empty());
        assert!(forward_camera()
            .unproject_far(ScreenPoint::new(0.0, 0.0), viewport)
            .is_none());
    }
}
