//! Tracking quality and the orientation-only fallback countdown

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why tracking quality is reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedReason {
    Initializing,
    ExcessiveMotion,
    InsufficientFeatures,
    Relocalizing,
}

/// Tracking quality reported by the host each time it changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum TrackingState {
    NotAvailable,
    Limited(LimitedReason),
    Normal,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingState::NotAvailable => write!(f, "not available"),
            TrackingState::Limited(reason) => write!(f, "limited ({:?})", reason),
            TrackingState::Normal => write!(f, "normal"),
        }
    }
}

/// Degrees of freedom the session tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingMode {
    /// Position and orientation
    #[default]
    SixDof,
    /// Orientation only
    ThreeDof,
}

/// Handle for one scheduled countdown.
///
/// Timer-driven hosts sleep until `deadline` and then report `generation`
/// back; a countdown rescheduled or cancelled in the meantime ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTicket {
    pub generation: u64,
    /// Time after scheduling at which the countdown expires
    pub delay: Duration,
    /// Session clock reading at which the countdown expires
    pub deadline: Duration,
}

/// A single cancellable deferred action.
///
/// Every `schedule` bumps a monotonic generation, so at most one countdown
/// is live and late expiries of earlier ones are rejected.
#[derive(Debug, Clone, Default)]
pub struct FallbackCountdown {
    generation: u64,
    pending: Option<CountdownTicket>,
}

impl FallbackCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown at clock reading `now`, replacing any pending one
    pub fn schedule(&mut self, now: Duration, delay: Duration) -> CountdownTicket {
        self.generation += 1;
        let ticket = CountdownTicket {
            generation: self.generation,
            delay,
            deadline: now + delay,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Drop the pending countdown. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Fire if the pending countdown's deadline has passed
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.pending {
            Some(ticket) if now >= ticket.deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Fire the countdown identified by `generation`, if it is still the
    /// pending one
    pub fn fire(&mut self, generation: u64) -> bool {
        match self.pending {
            Some(ticket) if ticket.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<CountdownTicket> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN: Duration = Duration::from_secs(10);

    #[test]
    fn test_fires_once_after_delay() {
        let mut countdown = FallbackCountdown::new();
        countdown.schedule(Duration::from_secs(1), TEN);

        assert!(!countdown.poll(Duration::from_secs(5)));
        assert!(countdown.poll(Duration::from_secs(11)));
        assert!(!countdown.poll(Duration::from_secs(12)));
        assert!(!countdown.is_pending());
    }

    #[test]
    fn test_reschedule_invalidates_earlier_generation() {
        let mut countdown = FallbackCountdown::new();
        let first = countdown.schedule(Duration::ZERO, TEN);
        let second = countdown.schedule(Duration::from_secs(3), TEN);

        assert!(second.generation > first.generation);
        assert_eq!(second.deadline, Duration::from_secs(13));
        assert!(!countdown.fire(first.generation));
        assert!(!countdown.poll(Duration::from_secs(10)));
        assert!(countdown.fire(second.generation));
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut countdown = FallbackCountdown::new();
        let ticket = countdown.schedule(Duration::ZERO, TEN);

        assert!(countdown.cancel());
        assert!(!countdown.cancel());
        assert!(!countdown.fire(ticket.generation));
        assert!(!countdown.poll(Duration::from_secs(60)));
    }

    #[test]
    fn test_tracking_state_serde() {
        let state: TrackingState =
            serde_json::from_str(r#"{"state":"limited","reason":"excessive_motion"}"#).unwrap();
        assert_eq!(state, TrackingState::Limited(LimitedReason::ExcessiveMotion));

        let normal: TrackingState = serde_json::from_str(r#"{"state":"normal"}"#).unwrap();
        assert_eq!(normal, TrackingState::Normal);
        assert_eq!(normal.to_string(), "normal");
    }
}
