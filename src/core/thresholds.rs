use serde::{Deserialize, Serialize};

use crate::core::{BloodSugarType, BloodSugarUnit, UnitConverter};
use crate::error::ChartResult;

const COMMON_LOW_MG_DL: f64 = 70.0;
const COMMON_WARNING_HIGH_MG_DL: f64 = 300.0;
const BEFORE_EATING_HIGH_MG_DL: f64 = 126.0;
const AFTER_EATING_HIGH_MG_DL: f64 = 200.0;
const HEMOGLOBIC_HIGH_PERCENT: f64 = 7.0;

/// Fixed clinical reference band for one subtype, expressed in `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub unit: BloodSugarUnit,
    pub high: f64,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub warning_high: Option<f64>,
}

impl ThresholdBand {
    /// `value >= high`.
    #[must_use]
    pub fn is_high(&self, value: f64) -> bool {
        value >= self.high
    }

    /// `value < low`; always `false` for bands without a low bound.
    #[must_use]
    pub fn is_low(&self, value: f64) -> bool {
        self.low.is_some_and(|low| value < low)
    }

    #[must_use]
    pub fn is_out_of_range(&self, value: f64) -> bool {
        self.is_high(value) || self.is_low(value)
    }

    /// Low readings, or readings at or above the warning level.
    #[must_use]
    pub fn shows_warning(&self, value: f64) -> bool {
        self.is_low(value) || self.warning_high.is_some_and(|warning| value >= warning)
    }

    /// Rescales every bound into `unit`.
    pub fn converted_to(
        &self,
        unit: BloodSugarUnit,
        subtype: BloodSugarType,
        converter: &dyn UnitConverter,
    ) -> ChartResult<Self> {
        if unit == self.unit || subtype == BloodSugarType::Hemoglobic {
            return Ok(*self);
        }
        let convert = |value: f64| converter.convert(value, subtype, self.unit, unit);
        Ok(Self {
            unit,
            high: convert(self.high)?,
            low: self.low.map(convert).transpose()?,
            warning_high: self.warning_high.map(convert).transpose()?,
        })
    }
}

/// Clinical reference lookup per subtype.
pub trait ThresholdLookup {
    fn thresholds_for(&self, subtype: BloodSugarType) -> ThresholdBand;
}

/// Reference ranges in mg/dL (glucose) and percent (HbA1c).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClinicalThresholds;

impl ThresholdLookup for ClinicalThresholds {
    fn thresholds_for(&self, subtype: BloodSugarType) -> ThresholdBand {
        match subtype {
            BloodSugarType::Fasting | BloodSugarType::BeforeEating => ThresholdBand {
                unit: BloodSugarUnit::MgDl,
                high: BEFORE_EATING_HIGH_MG_DL,
                low: Some(COMMON_LOW_MG_DL),
                warning_high: Some(COMMON_WARNING_HIGH_MG_DL),
            },
            BloodSugarType::Random | BloodSugarType::PostPrandial | BloodSugarType::AfterEating => {
                ThresholdBand {
                    unit: BloodSugarUnit::MgDl,
                    high: AFTER_EATING_HIGH_MG_DL,
                    low: Some(COMMON_LOW_MG_DL),
                    warning_high: Some(COMMON_WARNING_HIGH_MG_DL),
                }
            }
            BloodSugarType::Hemoglobic => ThresholdBand {
                unit: BloodSugarUnit::Percent,
                high: HEMOGLOBIC_HIGH_PERCENT,
                low: None,
                warning_high: None,
            },
        }
    }
}
