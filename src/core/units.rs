use crate::core::{BloodSugarType, BloodSugarUnit};
use crate::error::{ChartError, ChartResult};

/// mg/dL per mmol/L for glucose.
pub const GLUCOSE_MG_DL_PER_MMOL_L: f64 = 18.0;

/// Value-only unit rescaling used for threshold comparisons.
///
/// Hosts with their own unit tables plug in here; the chart core never does
/// unit arithmetic itself.
pub trait UnitConverter {
    fn convert(
        &self,
        value: f64,
        subtype: BloodSugarType,
        from: BloodSugarUnit,
        to: BloodSugarUnit,
    ) -> ChartResult<f64>;
}

/// Glucose mg/dL <-> mmol/L conversion; HbA1c percentages pass through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardUnitConverter;

impl UnitConverter for StandardUnitConverter {
    fn convert(
        &self,
        value: f64,
        subtype: BloodSugarType,
        from: BloodSugarUnit,
        to: BloodSugarUnit,
    ) -> ChartResult<f64> {
        if subtype == BloodSugarType::Hemoglobic || from == to {
            return Ok(value);
        }

        match (from, to) {
            (BloodSugarUnit::MgDl, BloodSugarUnit::MmolL) => Ok(value / GLUCOSE_MG_DL_PER_MMOL_L),
            (BloodSugarUnit::MmolL, BloodSugarUnit::MgDl) => Ok(value * GLUCOSE_MG_DL_PER_MMOL_L),
            _ => Err(ChartError::UnsupportedUnitConversion { subtype, from, to }),
        }
    }
}
