//! The placement session: one AR experience driven by frame ticks,
//! touches and tracking notifications.
//!
//! All state lives here and is mutated from a single update pass; hosts
//! that receive events on several tasks funnel them into one loop.

use std::time::Duration;

use arplace_config::PlacementConfig;
use arplace_spatial::Vector3;
use tracing::{debug, error, info, warn};

use crate::anchor::PlaneAnchor;
use crate::camera::{CameraPose, ScreenPoint, Viewport};
use crate::error::{PlacementError, Result, TrackingError};
use crate::filter::PlacementOutcome;
use crate::focus::FocusPoint;
use crate::gesture::{DragGesture, TouchPhase};
use crate::object::{ObjectId, ObjectState, PlacementContext, TransformReadout};
use crate::resolver::{PlacementResolver, PlacementResult};
use crate::snap::{PlaneSnapEngine, SnapAnimation, SnapDecision};
use crate::source::TrackingSource;
use crate::tracking::{CountdownTicket, FallbackCountdown, TrackingMode, TrackingState};

pub struct PlacementSession<S: TrackingSource> {
    source: S,
    viewport: Viewport,
    config: PlacementConfig,
    resolver: PlacementResolver,
    context: PlacementContext,
    snap: PlaneSnapEngine,
    snap_animation: Option<SnapAnimation>,
    focus: FocusPoint,
    drag: Option<DragGesture>,
    countdown: FallbackCountdown,
    tracking_state: TrackingState,
    tracking_mode: TrackingMode,
    clock: Duration,
    loading_object: bool,
    restarts: u32,
}

impl<S: TrackingSource> PlacementSession<S> {
    pub fn new(source: S, viewport: Viewport, config: PlacementConfig) -> Self {
        Self {
            resolver: PlacementResolver::new(&config),
            context: PlacementContext::new(&config.filter),
            snap: PlaneSnapEngine::new(&config.snap),
            snap_animation: None,
            focus: FocusPoint::new(),
            drag: None,
            countdown: FallbackCountdown::new(),
            tracking_state: TrackingState::NotAvailable,
            tracking_mode: TrackingMode::SixDof,
            clock: Duration::ZERO,
            loading_object: false,
            restarts: 0,
            source,
            viewport,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn context(&self) -> &PlacementContext {
        &self.context
    }

    pub fn focus(&self) -> &FocusPoint {
        &self.focus
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.tracking_state
    }

    pub fn tracking_mode(&self) -> TrackingMode {
        self.tracking_mode
    }

    /// Time accumulated through [`advance`](Self::advance)
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn restart_count(&self) -> u32 {
        self.restarts
    }

    pub fn is_snapping(&self) -> bool {
        self.snap_animation.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(DragGesture::is_translating)
    }

    pub fn set_drag_on_infinite_planes(&mut self, enabled: bool) {
        self.resolver.set_drag_on_infinite_planes(enabled);
    }

    pub fn selected_object(&self) -> Option<&ObjectState> {
        self.context.selected()
    }

    fn camera(&self) -> Option<CameraPose> {
        self.source.current_camera_pose()
    }

    /// Resolve a screen point against the current frame
    pub fn resolve_world_position(
        &self,
        point: ScreenPoint,
        previous_position: Option<Vector3>,
        allow_infinite_plane_drag: bool,
    ) -> PlacementResult {
        self.resolver.resolve(
            &self.source,
            self.viewport,
            point,
            previous_position,
            allow_infinite_plane_drag,
        )
    }

    /// Move the selected object to a resolved position.
    ///
    /// Without a camera pose nothing moves. A successful placement cancels
    /// any running snap animation.
    pub fn apply_placement(
        &mut self,
        position: Option<Vector3>,
        instantly: bool,
        filter_position: bool,
    ) -> PlacementOutcome {
        if position.is_none() {
            let outcome = self
                .context
                .place_selected(Vector3::ZERO, None, instantly, filter_position);
            if outcome == PlacementOutcome::Reset {
                self.reset_placement_state();
            }
            return outcome;
        }

        let Some(camera) = self.camera() else {
            debug!("No camera pose, object stays in place");
            return PlacementOutcome::Unchanged;
        };

        let outcome =
            self.context
                .place_selected(camera.position(), position, instantly, filter_position);
        if matches!(outcome, PlacementOutcome::Placed(_)) {
            self.snap_animation = None;
        }
        outcome
    }

    /// React to a plane anchor being added or refined
    pub fn on_plane_anchor_changed(&mut self, anchor: &PlaneAnchor) -> SnapDecision {
        let Some(object) = self.context.selected() else {
            return SnapDecision::NoSelection;
        };

        let decision = self.snap.evaluate(object.position, anchor);
        if let SnapDecision::Snap { target_y } = decision {
            info!(
                "Surface detected nearby, moving {} onto plane {} (y {:.3} -> {:.3})",
                object.name, anchor.id, object.position.y, target_y
            );
            self.snap_animation = Some(SnapAnimation {
                object: object.id,
                tween: self.snap.animation(object.position.y, target_y),
            });
        }
        decision
    }

    /// Handle one touch event.
    ///
    /// Returns the placement outcome when the touch moved the object.
    pub fn on_touch(&mut self, phase: TouchPhase, point: ScreenPoint) -> Option<PlacementOutcome> {
        match phase {
            TouchPhase::Began => {
                self.context.selected()?;
                // A further finger going down continues the drag in progress
                if self.drag.is_none() {
                    self.drag = Some(DragGesture::begin(
                        point,
                        self.config.gesture.translation_threshold,
                    ));
                }
                self.log_readout();
                None
            }
            TouchPhase::Moved => {
                if !self.context.is_object_placed() {
                    return None;
                }
                let outcome = self.drag_to(point);
                self.log_readout();
                outcome
            }
            TouchPhase::Ended => {
                let outcome = self.drag_to(point);
                self.drag = None;
                outcome
            }
            TouchPhase::Cancelled => {
                if !self.context.is_object_placed() {
                    return None;
                }
                self.drag = None;
                None
            }
        }
    }

    fn drag_to(&mut self, point: ScreenPoint) -> Option<PlacementOutcome> {
        let object_position = self.context.selected()?.position;
        let object_screen = self
            .camera()
            .and_then(|camera| camera.project(object_position, self.viewport));

        let target = self.drag.as_mut()?.update(point, object_screen)?;
        let result = self.resolve_world_position(target, Some(object_position), true);
        Some(self.apply_placement(result.position, false, !result.hit_a_plane))
    }

    fn log_readout(&self) {
        if let Some(readout) = self.selected_readout() {
            debug!("{}", readout);
        }
    }

    /// Advance the session clock by one frame.
    ///
    /// Polls the fallback countdown, steps the snap animation and refreshes
    /// the focus point.
    pub fn advance(&mut self, dt: Duration) {
        self.clock += dt;

        if self.countdown.poll(self.clock) {
            self.enter_three_dof();
        }

        if let Some(animation) = self.snap_animation.as_mut() {
            let y = animation.tween.update(dt);
            let done = animation.tween.complete;
            let id = animation.object;
            match self.context.selected_mut() {
                Some(object) if object.id == id => object.position.y = y,
                _ => self.snap_animation = None,
            }
            if done {
                self.snap_animation = None;
            }
        }

        let result = self.resolve_world_position(
            self.viewport.center(),
            self.focus.last_position(),
            false,
        );
        self.focus.update(&result);
    }

    /// Whether the focus indicator should be hidden because the selected
    /// object is in view
    pub fn focus_indicator_hidden(&self) -> bool {
        match (self.context.selected(), self.camera()) {
            (Some(object), Some(camera)) => camera.is_visible(object.position, self.viewport),
            _ => false,
        }
    }

    pub fn selected_readout(&self) -> Option<TransformReadout> {
        let camera = self.camera()?;
        Some(self.context.selected()?.readout(camera.position()))
    }

    /// Record a tracking quality change.
    ///
    /// With the orientation-only fallback enabled, limited tracking starts
    /// the fallback countdown and normal tracking cancels it. The returned
    /// ticket lets timer-driven hosts report expiry through
    /// [`on_fallback_elapsed`](Self::on_fallback_elapsed).
    pub fn on_tracking_state_changed(&mut self, state: TrackingState) -> Option<CountdownTicket> {
        if state != self.tracking_state {
            info!("Tracking state: {} -> {}", self.tracking_state, state);
        }
        self.tracking_state = state;

        if !self.config.tracking.use_3dof_fallback {
            return None;
        }

        match state {
            TrackingState::NotAvailable => None,
            TrackingState::Limited(_) => {
                let delay = self.config.tracking.fallback_delay();
                let ticket = self.countdown.schedule(self.clock, delay);
                debug!(
                    "Tracking fallback countdown {} scheduled for {:?}",
                    ticket.generation, delay
                );
                Some(ticket)
            }
            TrackingState::Normal => {
                if self.countdown.cancel() {
                    debug!("Tracking recovered, fallback countdown cancelled");
                }
                None
            }
        }
    }

    /// Report that the countdown for `generation` ran out.
    ///
    /// Stale generations are ignored. Returns whether the fallback engaged.
    pub fn on_fallback_elapsed(&mut self, generation: u64) -> bool {
        if self.countdown.fire(generation) {
            self.enter_three_dof();
            true
        } else {
            debug!("Ignoring stale fallback countdown {}", generation);
            false
        }
    }

    fn enter_three_dof(&mut self) {
        if self.tracking_mode != TrackingMode::ThreeDof {
            info!("Limited tracking persisted, falling back to orientation-only tracking");
            self.tracking_mode = TrackingMode::ThreeDof;
        }
    }

    /// Handle a failure reported by the tracking session.
    ///
    /// Recoverable failures restart the experience; anything else is
    /// returned to the host.
    pub fn on_session_error(&mut self, err: TrackingError) -> Result<()> {
        if err.is_recoverable() {
            warn!("{}, restarting the experience", err);
            self.restart_experience();
            Ok(())
        } else {
            error!("{}", err);
            self.reset_placement_state();
            Err(PlacementError::UnrecoverableTracking(err))
        }
    }

    pub fn on_interruption_ended(&mut self) {
        info!("Session interruption ended");
        self.restart_experience();
    }

    /// Start over: remove every object and forget all tracking-derived
    /// state. Ignored while an object is loading. Returns whether the
    /// restart happened.
    pub fn restart_experience(&mut self) -> bool {
        if self.loading_object {
            debug!("Restart ignored while an object is loading");
            return false;
        }

        self.reset_placement_state();
        self.focus.reset();
        self.countdown.cancel();
        self.tracking_mode = TrackingMode::SixDof;
        self.restarts += 1;
        info!("Experience restarted ({} total)", self.restarts);
        true
    }

    fn reset_placement_state(&mut self) {
        self.context.reset();
        self.snap_animation = None;
        self.drag = None;
    }

    pub fn set_loading_object(&mut self, loading: bool) {
        self.loading_object = loading;
    }

    pub fn is_loading_object(&self) -> bool {
        self.loading_object
    }

    /// Add an object, select it and place it instantly at the focus point
    pub fn add_object(&mut self, object: ObjectState) -> ObjectId {
        let name = object.name.clone();
        let id = self.context.add_object(object);
        self.context.select(id);
        self.drag = None;
        self.snap_animation = None;

        let position = self.focus.placement_position();
        info!("Placing {} at focus point {:?}", name, position);
        self.apply_placement(Some(position), true, false);
        id
    }

    /// Remove an object from the experience
    pub fn remove_object(&mut self, id: ObjectId) -> Option<ObjectState> {
        if self.snap_animation.as_ref().is_some_and(|a| a.object == id) {
            self.snap_animation = None;
        }
        if self.context.selected_id() == Some(id) {
            self.drag = None;
        }
        self.context.remove(id)
    }
}
