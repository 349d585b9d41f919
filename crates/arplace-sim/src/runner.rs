//! The frame loop.
//!
//! Frame ticks, the touch stream and fallback timer expiries arrive on
//! separate sources and are drained by one `select!` loop, which is the
//! only place the session is touched.

use std::time::Duration;

use anyhow::{Context, Result};
use arplace_core::{
    ObjectState, PlacementConfig, PlacementOutcome, PlacementSession, TrackingError,
    TrackingMode, TransformReadout,
};
use arplace_spatial::Vector3;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::scene::{SceneDescription, SceneEvent, ScriptedTouch};
use crate::tracker::SceneTracker;

/// How long to run and how fast
#[derive(Debug, Clone, Copy)]
pub struct SimulationOptions {
    pub frames: u32,
    pub fps: u32,
}

impl SimulationOptions {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            frames: 120,
            fps: 60,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    pub frames: u32,
    pub objects_added: usize,
    pub placements: usize,
    pub snaps: usize,
    pub restarts: u32,
    pub tracking_mode: TrackingMode,
    pub focus: Option<Vector3>,
    pub selected_position: Option<Vector3>,
    pub readout: Option<TransformReadout>,
}

type Session = PlacementSession<SceneTracker>;

/// Run `scene` to completion
pub async fn run(
    scene: SceneDescription,
    config: PlacementConfig,
    options: SimulationOptions,
) -> Result<SimulationReport> {
    let frame = options.frame_duration();
    let mut session = PlacementSession::new(
        SceneTracker::new(scene.features.clone()),
        scene.viewport,
        config,
    );
    let mut report = SimulationReport::default();

    let start = Instant::now();
    let (touch_tx, mut touch_rx) = mpsc::channel(64);
    let feeder = tokio::spawn(feed_touches(scene.touches.clone(), start, frame, touch_tx));
    let (expired_tx, mut expired_rx) = mpsc::unbounded_channel::<u64>();

    let mut ticker = time::interval_at(start, frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Running {} frames at {} fps ({} touches scripted)",
        options.frames,
        options.fps,
        scene.touches.len()
    );

    let mut frame_index = 0;
    while frame_index < options.frames {
        tokio::select! {
            _ = ticker.tick() => {
                step_frame(&mut session, &scene, frame_index, frame, &expired_tx, &mut report)?;
                frame_index += 1;
            }
            Some(touch) = touch_rx.recv() => {
                trace!("Touch {:?} at ({:.0}, {:.0})", touch.phase, touch.point.x, touch.point.y);
                if let Some(PlacementOutcome::Placed(_)) = session.on_touch(touch.phase, touch.point) {
                    report.placements += 1;
                }
            }
            Some(generation) = expired_rx.recv() => {
                session.on_fallback_elapsed(generation);
            }
        }
    }
    feeder.abort();

    report.frames = frame_index;
    report.restarts = session.restart_count();
    report.tracking_mode = session.tracking_mode();
    report.focus = session.focus().last_position();
    report.selected_position = session.selected_object().map(|o| o.position);
    report.readout = session.selected_readout();

    info!(
        "Finished: {} placements, {} snaps, {} restarts",
        report.placements, report.snaps, report.restarts
    );
    Ok(report)
}

/// Deliver scripted touches half a frame after their frame's tick
async fn feed_touches(
    touches: Vec<ScriptedTouch>,
    start: Instant,
    frame: Duration,
    tx: mpsc::Sender<ScriptedTouch>,
) {
    for touch in touches {
        let at = start + frame * touch.frame + frame / 2;
        time::sleep_until(at).await;
        if tx.send(touch).await.is_err() {
            break;
        }
    }
}

fn step_frame(
    session: &mut Session,
    scene: &SceneDescription,
    frame_index: u32,
    frame: Duration,
    expired_tx: &mpsc::UnboundedSender<u64>,
    report: &mut SimulationReport,
) -> Result<()> {
    let camera = (frame_index >= scene.camera.available_from_frame).then(|| scene.camera.pose());
    session.source_mut().set_camera(camera);

    for event in scene.events_at(frame_index) {
        debug!("Frame {}: {:?}", frame_index, event);
        match event {
            SceneEvent::Tracking { state } => {
                if let Some(ticket) = session.on_tracking_state_changed(*state) {
                    let tx = expired_tx.clone();
                    tokio::spawn(async move {
                        time::sleep(ticket.delay).await;
                        let _ = tx.send(ticket.generation);
                    });
                }
            }
            SceneEvent::AddObject { name } => {
                session.add_object(ObjectState::new(name.as_str()));
                report.objects_added += 1;
            }
            SceneEvent::RevealPlane { plane } => {
                let anchor = session.source_mut().reveal_plane(plane);
                if session.on_plane_anchor_changed(&anchor).is_snap() {
                    report.snaps += 1;
                }
            }
            SceneEvent::TrackingFailed { reason } => {
                restart_tracker(session, |s| {
                    s.on_session_error(TrackingError::WorldTrackingFailed(reason.clone()))
                })?;
            }
            SceneEvent::CameraDenied => {
                session
                    .on_session_error(TrackingError::CameraUnauthorized)
                    .with_context(|| format!("Session failed at frame {}", frame_index))?;
            }
            SceneEvent::InterruptionEnded => {
                restart_tracker(session, |s| {
                    s.on_interruption_ended();
                    Ok(())
                })?;
            }
            SceneEvent::Restart => {
                restart_tracker(session, |s| {
                    s.restart_experience();
                    Ok(())
                })?;
            }
        }
    }

    session.advance(frame);
    trace!(
        "Frame {}: focus {:?}, indicator hidden {}",
        frame_index,
        session.focus().last_position(),
        session.focus_indicator_hidden()
    );
    Ok(())
}

/// Run `action` and drop detected planes if it restarted the experience
fn restart_tracker(
    session: &mut Session,
    action: impl FnOnce(&mut Session) -> arplace_core::Result<()>,
) -> Result<()> {
    let before = session.restart_count();
    action(session)?;
    if session.restart_count() != before {
        session.source_mut().clear_planes();
    }
    Ok(())
}
