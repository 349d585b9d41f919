//! arplace-core: turning screen touches into stable world placements
//!
//! The pipeline, leaves first:
//! - [`raycast`]: screen point to world ray, ray against horizontal planes
//! - [`features`]: cone and nearest hit tests against the raw feature cloud
//! - [`resolver`]: the five-tier fallback cascade producing a [`PlacementResult`]
//! - [`filter`]: distance clamping and rolling-average smoothing
//! - [`snap`]: dropping the selected object onto newly detected planes
//!
//! [`PlacementSession`] wires these together behind a [`TrackingSource`]
//! supplied by the host, and adds the focus point, touch dragging,
//! tracking-quality fallback and experience restart.

pub mod anchor;
pub mod animation;
pub mod camera;
pub mod error;
pub mod features;
pub mod filter;
pub mod focus;
pub mod gesture;
pub mod object;
pub mod raycast;
pub mod resolver;
pub mod session;
pub mod snap;
pub mod source;
pub mod tracking;

pub use anchor::{PlaneAnchor, PlaneExtent, PlaneHit};
pub use animation::{Easing, Tween};
pub use camera::{CameraPose, Projection, ScreenPoint, Viewport};
pub use error::{PlacementError, Result, TrackingError};
pub use features::{ConeQuery, FeatureHitResult};
pub use filter::{PlacementFilter, PlacementOutcome};
pub use focus::FocusPoint;
pub use gesture::{DragGesture, TouchEvent, TouchPhase};
pub use object::{ObjectId, ObjectState, PlacementContext, TransformReadout};
pub use resolver::{PlacementResolver, PlacementResult, PlacementTier};
pub use session::PlacementSession;
pub use snap::{PlaneSnapEngine, SnapAnimation, SnapDecision};
pub use source::TrackingSource;
pub use tracking::{CountdownTicket, FallbackCountdown, LimitedReason, TrackingMode, TrackingState};

pub use arplace_config::PlacementConfig;
pub use arplace_spatial::{Quaternion, Ray, Transform, Vector3};
