//! Distance clamping and temporal smoothing of placements

use arplace_config::FilterConfig;
use arplace_spatial::{RollingAverage, Vector3};
use tracing::debug;

/// What an `apply_placement` call did to the selected object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    /// The object moved to this position
    Placed(Vector3),
    /// Nothing moved
    Unchanged,
    /// Placement failed before any object was placed; state was reset
    Reset,
}

/// Smooths the camera-to-object distance of the selected object.
///
/// The distance history belongs to one object; callers clear it whenever
/// the selection changes.
#[derive(Debug, Clone)]
pub struct PlacementFilter {
    max_camera_distance: f32,
    history: RollingAverage,
}

impl PlacementFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            max_camera_distance: config.max_camera_distance,
            history: RollingAverage::new(config.history_capacity),
        }
    }

    /// Final object position for a resolved `position` seen from `camera`.
    ///
    /// The camera-to-position offset is clamped to the maximum camera
    /// distance. Instant placement clears the history; otherwise the clamped
    /// length is recorded and, with `filter`, replaced by the history mean.
    pub fn place(&mut self, camera: Vector3, position: Vector3, instantly: bool, filter: bool) -> Vector3 {
        let mut camera_to_position = (position - camera).clamp_length(self.max_camera_distance);

        if instantly {
            self.history.clear();
            return camera + camera_to_position;
        }

        self.history.push(camera_to_position.length());
        if filter {
            if let Some(average) = self.history.average() {
                camera_to_position.set_length(average);
                debug!(
                    "Filtered placement distance {:.3} over {} samples",
                    average,
                    self.history.len()
                );
            }
        }

        camera + camera_to_position
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Recorded distances, oldest first
    pub fn history(&self) -> impl Iterator<Item = &f32> {
        self.history.iter()
    }

    pub fn max_camera_distance(&self) -> f32 {
        self.max_camera_distance
    }
}

impl Default for PlacementFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
