//! Placed virtual objects and the registry that tracks the selected one

use std::fmt;

use arplace_config::FilterConfig;
use arplace_spatial::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::filter::{PlacementFilter, PlacementOutcome};

pub type ObjectId = Uuid;

/// Pose of one virtual object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    pub id: ObjectId,
    pub name: String,
    pub position: Vector3,
    pub rotation: Quaternion,
    /// Uniform scale factor
    pub scale: f32,
}

impl ObjectState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: 1.0,
        }
    }

    /// Human-facing summary relative to the camera
    pub fn readout(&self, camera: Vector3) -> TransformReadout {
        let degrees = self.rotation.yaw().to_degrees() as i32 % 360;
        TransformReadout {
            distance_to_camera: self.position.distance(&camera),
            yaw_degrees: if degrees < 0 { degrees + 360 } else { degrees },
            scale: self.scale,
        }
    }
}

/// Distance, heading and scale of an object as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformReadout {
    pub distance_to_camera: f32,
    /// Whole degrees in `[0, 360)`
    pub yaw_degrees: i32,
    pub scale: f32,
}

impl fmt::Display for TransformReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Distance: {:.2} m, Rotation: {}°, Scale: {:.2}x",
            self.distance_to_camera, self.yaw_degrees, self.scale
        )
    }
}

/// Objects in the experience and the one currently being placed.
///
/// The filter's distance history belongs to the selected object and is
/// dropped whenever the selection changes.
#[derive(Debug)]
pub struct PlacementContext {
    objects: Vec<ObjectState>,
    selected: Option<ObjectId>,
    filter: PlacementFilter,
}

impl PlacementContext {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            objects: Vec::new(),
            selected: None,
            filter: PlacementFilter::new(config),
        }
    }

    /// Register an object; it is not selected
    pub fn add_object(&mut self, object: ObjectState) -> ObjectId {
        let id = object.id;
        debug!("Added object {} ({})", object.name, id);
        self.objects.push(object);
        id
    }

    /// Make `id` the selected object. Returns `false` for unknown ids.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.objects.iter().any(|o| o.id == id) {
            warn!("Cannot select unknown object {}", id);
            return false;
        }
        if self.selected != Some(id) {
            self.filter.clear_history();
        }
        self.selected = Some(id);
        true
    }

    pub fn selected(&self) -> Option<&ObjectState> {
        let id = self.selected?;
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn selected_mut(&mut self) -> Option<&mut ObjectState> {
        let id = self.selected?;
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Whether an object has been selected for placement
    pub fn is_object_placed(&self) -> bool {
        self.selected.is_some()
    }

    pub fn objects(&self) -> &[ObjectState] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove an object, dropping the selection if it was selected
    pub fn remove(&mut self, id: ObjectId) -> Option<ObjectState> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
            self.filter.clear_history();
        }
        Some(self.objects.remove(index))
    }

    /// Move the selected object to a resolved position.
    ///
    /// An absent position leaves a placed object where it is, and resets the
    /// context when nothing has been placed yet.
    pub fn place_selected(
        &mut self,
        camera: Vector3,
        position: Option<Vector3>,
        instantly: bool,
        filter: bool,
    ) -> PlacementOutcome {
        let Some(position) = position else {
            warn!("Cannot place object, try moving left or right");
            if !self.is_object_placed() {
                self.reset();
                return PlacementOutcome::Reset;
            }
            return PlacementOutcome::Unchanged;
        };

        let Some(id) = self.selected else {
            return PlacementOutcome::Unchanged;
        };

        let placed = self.filter.place(camera, position, instantly, filter);
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(object) => {
                object.position = placed;
                debug!(
                    "Placed {} at ({:.3}, {:.3}, {:.3}){}",
                    object.name,
                    placed.x,
                    placed.y,
                    placed.z,
                    if instantly { " instantly" } else { "" }
                );
                PlacementOutcome::Placed(placed)
            }
            None => PlacementOutcome::Unchanged,
        }
    }

    /// Drop all objects, the selection and the distance history
    pub fn reset(&mut self) {
        if !self.objects.is_empty() {
            info!("Removing {} virtual objects", self.objects.len());
        }
        self.objects.clear();
        self.selected = None;
        self.filter.clear_history();
    }

    pub fn filter(&self) -> &PlacementFilter {
        &self.filter
    }
}

impl Default for PlacementContext {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
