//! Error types for the placement core.
//!
//! Geometry queries never error; they return `Option` and the resolver
//! cascades. Only failures reported by the tracking layer and configuration
//! problems surface as errors.

use arplace_config::ConfigError;

/// Failures reported by the external tracking session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackingError {
    #[error("World tracking failed: {0}")]
    WorldTrackingFailed(String),

    #[error("Camera access was denied")]
    CameraUnauthorized,

    #[error("Motion sensors are unavailable")]
    SensorUnavailable,

    #[error("World tracking is not supported on this device")]
    Unsupported,

    #[error("Tracking session error: {0}")]
    Other(String),
}

impl TrackingError {
    /// Whether restarting the experience can recover from this failure
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrackingError::WorldTrackingFailed(_))
    }
}

/// Errors surfaced by the placement session.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("Unrecoverable tracking failure, the experience must restart: {0}")]
    UnrecoverableTracking(#[source] TrackingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, PlacementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(TrackingError::WorldTrackingFailed("drift".into()).is_recoverable());
        assert!(!TrackingError::CameraUnauthorized.is_recoverable());
        assert!(!TrackingError::Other("boom".into()).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = PlacementError::UnrecoverableTracking(TrackingError::Unsupported);
        assert_eq!(
            err.to_string(),
            "Unrecoverable tracking failure, the experience must restart: World tracking is not supported on this device"
        );
    }
}
