//! Screen-to-world placement for AR objects.
//!
//! `arplace` turns a 2D screen point into a world position using the
//! tracking layer's detected planes and feature points, smooths and clamps
//! the result, and settles placed objects onto surfaces as they are
//! discovered.
//!
//! ```no_run
//! use arplace::{ObjectState, PlacementConfig, PlacementSession, TrackingSource, Viewport};
//!
//! fn place<S: TrackingSource>(source: S) {
//!     let mut session = PlacementSession::new(source, Viewport::new(390.0, 844.0), PlacementConfig::default());
//!     session.advance(std::time::Duration::from_millis(16));
//!     session.add_object(ObjectState::new("vase"));
//! }
//! ```

pub use arplace_config as config;
pub use arplace_core::*;
pub use arplace_spatial as spatial;
