//! Export configuration supplied per export session.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Read-only settings for one export run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Bake every group regardless of its authored interpolation.
    pub force_sampling: bool,
    /// Convert values from a Z-up authoring space to a Y-up output space.
    pub y_up: bool,
    /// Bake rate in samples per source time unit (the bake step is `1 / frame_rate`).
    pub frame_rate: f64,
    /// Source time units per second; keyframe times are divided by this.
    /// 1.0 when curves are authored in seconds, the scene fps when authored in frames.
    pub source_units_per_second: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            force_sampling: false,
            y_up: true,
            frame_rate: 24.0,
            source_units_per_second: 1.0,
        }
    }
}

impl ExportSettings {
    /// Create settings with the given bake rate.
    pub fn new(frame_rate: f64) -> Self {
        Self {
            frame_rate,
            ..Default::default()
        }
    }

    pub fn with_force_sampling(mut self, force: bool) -> Self {
        self.force_sampling = force;
        self
    }

    pub fn with_y_up(mut self, y_up: bool) -> Self {
        self.y_up = y_up;
        self
    }

    pub fn with_source_units_per_second(mut self, units: f64) -> Self {
        self.source_units_per_second = units;
        self
    }

    /// Distance between two baked samples, in source time units.
    #[inline]
    pub fn bake_step(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Convert a source time to seconds.
    #[inline]
    pub fn to_seconds(&self, source_time: f64) -> f64 {
        source_time / self.source_units_per_second
    }

    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ExportError::InvalidSettings {
                reason: format!("frame rate must be positive and finite, got {}", self.frame_rate),
            });
        }
        if !self.source_units_per_second.is_finite() || self.source_units_per_second <= 0.0 {
            return Err(ExportError::InvalidSettings {
                reason: format!(
                    "source units per second must be positive and finite, got {}",
                    self.source_units_per_second
                ),
            });
        }
        Ok(())
    }
}
