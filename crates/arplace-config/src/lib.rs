//! Configuration for the arplace placement pipeline.
//!
//! Every tunable constant of the resolver, filter, snap engine, drag gesture
//! and tracking fallback lives here. Files are TOML; every section and field
//! is optional and falls back to the defaults below.
//!
//! ```toml
//! [hit_test]
//! cone_angle_degrees = 18.0
//! min_distance = 0.2
//! max_distance = 2.0
//!
//! [filter]
//! max_camera_distance = 10.0
//! history_capacity = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Feature-point and infinite-plane hit testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Full opening angle of the feature cone
    pub cone_angle_degrees: f32,
    /// Nearest accepted projection distance along the ray (metres)
    pub min_distance: f32,
    /// Farthest accepted projection distance along the ray (metres)
    pub max_distance: f32,
    /// Number of cone hits kept after sorting
    pub max_results: usize,
    /// Rays with a vertical component above this never hit the infinite plane
    pub min_downward_ray_y: f32,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            cone_angle_degrees: 18.0,
            min_distance: 0.2,
            max_distance: 2.0,
            max_results: 1,
            min_downward_ray_y: -0.03,
        }
    }
}

/// Distance clamping and temporal smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Upper bound on the camera-to-object distance (metres)
    pub max_camera_distance: f32,
    /// Number of recent distances averaged when filtering
    pub history_capacity: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_camera_distance: 10.0,
            history_capacity: 10,
        }
    }
}

/// Settling objects onto newly detected planes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Fraction of the plane extent added on each side of the footprint
    pub extent_tolerance: f32,
    /// Half-height of the band around the plane that counts as resting
    pub vertical_allowance: f32,
    /// Duration of the drop animation (seconds)
    pub animation_seconds: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            extent_tolerance: 0.1,
            vertical_allowance: 0.03,
            animation_seconds: 0.5,
        }
    }
}

impl SnapConfig {
    /// `animation_seconds` as a duration; unrepresentable values fall back
    /// to the default
    pub fn animation_duration(&self) -> Duration {
        seconds_or_default(
            "snap.animation_seconds",
            self.animation_seconds,
            Self::default().animation_seconds,
        )
    }
}

/// Touch dragging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Screen distance a touch must travel before the object starts moving
    pub translation_threshold: f32,
    /// Whether drags may fall back to the infinite horizontal plane
    pub drag_on_infinite_planes: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            translation_threshold: 30.0,
            drag_on_infinite_planes: false,
        }
    }
}

/// Tracking-quality fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Fall back to orientation-only tracking after a long limited period
    pub use_3dof_fallback: bool,
    /// Seconds of limited tracking before the fallback engages
    pub fallback_seconds: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            use_3dof_fallback: false,
            fallback_seconds: 10.0,
        }
    }
}

impl TrackingConfig {
    /// `fallback_seconds` as a duration; unrepresentable values fall back
    /// to the default
    pub fn fallback_delay(&self) -> Duration {
        seconds_or_default(
            "tracking.fallback_seconds",
            self.fallback_seconds,
            Self::default().fallback_seconds,
        )
    }
}

fn seconds_or_default(field: &str, seconds: f32, default: f32) -> Duration {
    Duration::try_from_secs_f32(seconds).unwrap_or_else(|_| {
        tracing::warn!("Ignoring {} = {}, using {}s", field, seconds, default);
        Duration::from_secs_f32(default)
    })
}

/// Top-level placement configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub hit_test: HitTestConfig,
    pub filter: FilterConfig,
    pub snap: SnapConfig,
    pub gesture: GestureConfig,
    pub tracking: TrackingConfig,
}

impl PlacementConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: PlacementConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded placement config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Platform config location, e.g. `~/.config/arplace/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "arplace")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let hit = &self.hit_test;
        if !(hit.cone_angle_degrees > 0.0) {
            return Err(invalid("hit_test.cone_angle_degrees", "must be positive"));
        }
        if hit.min_distance < 0.0 {
            return Err(invalid("hit_test.min_distance", "must not be negative"));
        }
        if hit.max_distance < hit.min_distance {
            return Err(invalid(
                "hit_test.max_distance",
                format!("must be >= min_distance ({})", hit.min_distance),
            ));
        }
        if hit.max_results == 0 {
            return Err(invalid("hit_test.max_results", "must be at least 1"));
        }
        if !(-1.0..=0.0).contains(&hit.min_downward_ray_y) {
            return Err(invalid("hit_test.min_downward_ray_y", "must be within [-1, 0]"));
        }

        if !(self.filter.max_camera_distance > 0.0) {
            return Err(invalid("filter.max_camera_distance", "must be positive"));
        }
        if self.filter.history_capacity == 0 {
            return Err(invalid("filter.history_capacity", "must be at least 1"));
        }

        if self.snap.extent_tolerance < 0.0 {
            return Err(invalid("snap.extent_tolerance", "must not be negative"));
        }
        if !(self.snap.vertical_allowance > 0.0) {
            return Err(invalid("snap.vertical_allowance", "must be positive"));
        }
        let animation = self.snap.animation_seconds;
        if !animation.is_finite() || animation < 0.0 {
            return Err(invalid("snap.animation_seconds", "must be finite and not negative"));
        }

        if self.gesture.translation_threshold < 0.0 {
            return Err(invalid("gesture.translation_threshold", "must not be negative"));
        }
        let fallback = self.tracking.fallback_seconds;
        if !fallback.is_finite() || fallback <= 0.0 {
            return Err(invalid("tracking.fallback_seconds", "must be finite and positive"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
