//! Scripted scenes: what the simulated tracker sees and when

use std::path::Path;

use anyhow::{Context, Result};
use arplace_core::{CameraPose, PlaneExtent, Projection, ScreenPoint, TouchPhase, TrackingState};
use arplace_core::{LimitedReason, Viewport};
use arplace_spatial::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A fixed camera looking at a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCamera {
    pub position: Vector3,
    pub target: Vector3,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    /// Frame at which tracking produces the first pose
    #[serde(default)]
    pub available_from_frame: u32,
}

fn default_fov() -> f32 {
    60.0
}

impl SceneCamera {
    pub fn pose(&self) -> CameraPose {
        CameraPose::looking_at(
            self.position,
            self.target,
            Projection::perspective(self.fov_degrees),
        )
    }
}

/// A horizontal surface the tracker detects during the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePlane {
    /// Stable name; revealing the same name again refines that plane
    pub name: String,
    pub position: Vector3,
    pub extent: PlaneExtent,
}

/// Something that happens at a given frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneEvent {
    Tracking { state: TrackingState },
    AddObject { name: String },
    RevealPlane { plane: ScenePlane },
    /// Recoverable world-tracking failure
    TrackingFailed { reason: String },
    /// Camera access revoked; ends the run
    CameraDenied,
    InterruptionEnded,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub frame: u32,
    #[serde(flatten)]
    pub event: SceneEvent,
}

/// A touch delivered on the input stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedTouch {
    pub frame: u32,
    pub phase: TouchPhase,
    pub point: ScreenPoint,
}

/// Everything a simulated run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub viewport: Viewport,
    pub camera: SceneCamera,
    #[serde(default)]
    pub features: Vec<Vector3>,
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
    #[serde(default)]
    pub touches: Vec<ScriptedTouch>,
}

impl SceneDescription {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("Failed to parse scene description")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Self::from_json(&source).with_context(|| format!("Invalid scene {}", path.display()))
    }

    /// Events scheduled for `frame`, in file order
    pub fn events_at(&self, frame: u32) -> impl Iterator<Item = &SceneEvent> {
        self.events
            .iter()
            .filter(move |e| e.frame == frame)
            .map(|e| &e.event)
    }

    /// A floor scene with a noisy feature cloud.
    ///
    /// Tracking starts limited, an object is added once the focus point has
    /// settled, the floor plane is detected a little later, and the object
    /// is then dragged towards the camera.
    pub fn synthetic(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let features = (0..240)
            .map(|_| {
                Vector3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-0.004..0.004),
                    rng.gen_range(0.4..2.5),
                )
            })
            .collect();

        let viewport = Viewport::new(390.0, 844.0);
        let center = viewport.center();
        let floor = |extent: f32| ScenePlane {
            name: "floor".to_string(),
            position: Vector3::new(0.0, 0.0, 1.2),
            extent: PlaneExtent::new(extent, extent),
        };

        let events = vec![
            ScheduledEvent {
                frame: 0,
                event: SceneEvent::Tracking {
                    state: TrackingState::Limited(LimitedReason::Initializing),
                },
            },
            ScheduledEvent {
                frame: 8,
                event: SceneEvent::Tracking {
                    state: TrackingState::Normal,
                },
            },
            ScheduledEvent {
                frame: 20,
                event: SceneEvent::AddObject {
                    name: "vase".to_string(),
                },
            },
            ScheduledEvent {
                frame: 45,
                event: SceneEvent::RevealPlane { plane: floor(1.0) },
            },
            ScheduledEvent {
                frame: 75,
                event: SceneEvent::RevealPlane { plane: floor(2.0) },
            },
        ];

        let mut touches = vec![ScriptedTouch {
            frame: 90,
            phase: TouchPhase::Began,
            point: center,
        }];
        touches.extend((1..=12).map(|step| ScriptedTouch {
            frame: 90 + step,
            phase: TouchPhase::Moved,
            point: ScreenPoint::new(center.x, center.y + step as f32 * 8.0),
        }));
        touches.push(ScriptedTouch {
            frame: 103,
            phase: TouchPhase::Ended,
            point: ScreenPoint::new(center.x, center.y + 96.0),
        });

        Self {
            viewport,
            camera: SceneCamera {
                position: Vector3::new(0.0, 1.4, 0.0),
                target: Vector3::new(0.0, 0.0, 1.2),
                fov_degrees: 60.0,
                available_from_frame: 2,
            },
            features,
            events,
            touches,
        }
    }
}
