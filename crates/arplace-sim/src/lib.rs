//! Headless host for the placement core.
//!
//! Plays a [`SceneDescription`] through a [`PlacementSession`] on a tokio
//! runtime: a frame interval, a scripted touch stream and fallback timers,
//! all drained by one loop.
//!
//! [`PlacementSession`]: arplace_core::PlacementSession

pub mod runner;
pub mod scene;
pub mod tracker;

pub use runner::{run, SimulationOptions, SimulationReport};
pub use scene::{SceneCamera, SceneDescription, SceneEvent, ScenePlane, ScheduledEvent, ScriptedTouch};
pub use tracker::SceneTracker;
