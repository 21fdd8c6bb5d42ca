//! Engine configuration
//!
//! Tunables for picking, lasso dragging, cache staleness and the marker
//! visualization. Stored as RON, every field optional:
//!
//! ```text
//! (
//!   pick_radius_sq: 0.0025,
//!   drag_threshold_px: 2.0,
//!   max_markers: 4096,
//! )
//! ```

use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vertices per cube marker
pub const MARKER_VERTEX_COUNT: usize = 8;

/// Most markers that fit in one mesh with 16-bit indices
pub const MARKER_CAPACITY: usize = (u16::MAX as usize + 1) / MARKER_VERTEX_COUNT;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Squared world-space distance from the pick ray that still counts as a hit
    pub pick_radius_sq: f32,
    /// Pointer travel (pixels) before a press on empty space becomes a lasso
    pub drag_threshold_px: f32,
    /// Largest per-component position change that does not count as a rebuild
    pub stale_epsilon: f32,
    /// Half-extent of the cube marker drawn at each vertex
    pub marker_half_size: f32,
    /// Visualization budget; vertices past this index are neither shown nor selectable
    pub max_markers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pick_radius_sq: 0.05 * 0.05,
            drag_threshold_px: 2.0,
            stale_epsilon: 1e-5,
            marker_half_size: 0.01,
            max_markers: MARKER_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse from RON text and validate
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: format!("{} must be finite and > 0", value) })
            }
        }

        positive("pick_radius_sq", self.pick_radius_sq)?;
        positive("marker_half_size", self.marker_half_size)?;
        if !self.drag_threshold_px.is_finite() || self.drag_threshold_px < 0.0 {
            return Err(ConfigError::Invalid {
                field: "drag_threshold_px",
                reason: format!("{} must be finite and >= 0", self.drag_threshold_px),
            });
        }
        if !self.stale_epsilon.is_finite() || self.stale_epsilon < 0.0 {
            return Err(ConfigError::Invalid {
                field: "stale_epsilon",
                reason: format!("{} must be finite and >= 0", self.stale_epsilon),
            });
        }
        if self.max_markers == 0 {
            return Err(ConfigError::Invalid { field: "max_markers", reason: "must be at least 1".to_string() });
        }
        Ok(())
    }

    /// Marker budget clamped to what a 16-bit index buffer can address
    pub fn marker_budget(&self) -> usize {
        self.max_markers.min(MARKER_CAPACITY)
    }
}
