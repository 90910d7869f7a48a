use serde::{Deserialize, Serialize};

use crate::core::BloodSugarUnit;
use crate::error::{ChartError, ChartResult};

/// Chart data build configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Missing fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDataConfig {
    /// Unit the domain bounds and threshold lines are expressed in.
    #[serde(default)]
    pub display_unit: BloodSugarUnit,
    /// Fraction of the clinical threshold added as domain headroom.
    #[serde(default = "default_headroom_ratio")]
    pub headroom_ratio: f64,
    #[serde(default = "default_clamp_floor_at_zero")]
    pub clamp_floor_at_zero: bool,
}

impl Default for ChartDataConfig {
    fn default() -> Self {
        Self {
            display_unit: BloodSugarUnit::default(),
            headroom_ratio: default_headroom_ratio(),
            clamp_floor_at_zero: default_clamp_floor_at_zero(),
        }
    }
}

impl ChartDataConfig {
    #[must_use]
    pub fn with_display_unit(mut self, display_unit: BloodSugarUnit) -> Self {
        self.display_unit = display_unit;
        self
    }

    #[must_use]
    pub fn with_headroom_ratio(mut self, headroom_ratio: f64) -> Self {
        self.headroom_ratio = headroom_ratio;
        self
    }

    #[must_use]
    pub fn with_clamp_floor_at_zero(mut self, clamp: bool) -> Self {
        self.clamp_floor_at_zero = clamp;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.headroom_ratio.is_finite() || self.headroom_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "headroom ratio must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }
}

fn default_headroom_ratio() -> f64 {
    0.10
}

fn default_clamp_floor_at_zero() -> bool {
    true
}
