//! The focus point: where the screen centre meets the world

use arplace_spatial::Vector3;

use crate::resolver::PlacementResult;

/// Tracks the world position under the screen centre across frames
#[derive(Debug, Clone, Default)]
pub struct FocusPoint {
    last_position: Option<Vector3>,
    on_plane: bool,
}

impl FocusPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take this frame's resolution of the screen centre.
    ///
    /// A frame without a position keeps the previous one.
    pub fn update(&mut self, result: &PlacementResult) {
        if let Some(position) = result.position {
            self.last_position = Some(position);
            self.on_plane = result.plane_anchor.is_some();
        }
    }

    pub fn last_position(&self) -> Option<Vector3> {
        self.last_position
    }

    /// Whether the last position came from a detected plane
    pub fn is_on_plane(&self) -> bool {
        self.on_plane
    }

    /// Where a newly added object goes
    pub fn placement_position(&self) -> Vector3 {
        self.last_position.unwrap_or(Vector3::ZERO)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
