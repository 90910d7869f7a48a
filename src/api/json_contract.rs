use serde::{Deserialize, Serialize};

use crate::core::{AxisTickLabel, BloodSugarType, BloodSugarUnit, Period, ThresholdBand};
use crate::error::{ChartError, ChartResult};

use super::{ChartData, LinePoint, MinMaxBand, ScatterPoint, SubtypePresence};

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Owned capture of every derived series of a `ChartData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub title: String,
    pub subtype: BloodSugarType,
    pub period: Period,
    pub display_unit: BloodSugarUnit,
    pub index_values: Vec<usize>,
    pub axis_labels: Vec<AxisTickLabel>,
    pub scatter_points: Vec<ScatterPoint>,
    pub min_max_bands: Vec<MinMaxBand>,
    #[serde(default)]
    pub line_series: Vec<LinePoint>,
    pub overall_min: Option<f64>,
    pub overall_max: Option<f64>,
    pub domain_floor: f64,
    pub domain_ceiling: f64,
    pub thresholds: ThresholdBand,
    pub has_previous_period: bool,
    pub has_next_period: bool,
    pub presence: SubtypePresence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl ChartData<'_> {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            title: self.title(),
            subtype: self.subtype(),
            period: self.request().period(),
            display_unit: self.config().display_unit,
            index_values: self.index_values(),
            axis_labels: self.axis_labels(),
            scatter_points: self.scatter_points().to_vec(),
            min_max_bands: self.min_max_bands(),
            line_series: self.line_series(),
            overall_min: self.overall_min(),
            overall_max: self.overall_max(),
            domain_floor: self.domain_floor(),
            domain_ceiling: self.domain_ceiling(),
            thresholds: self.thresholds(),
            has_previous_period: self.has_previous_period(),
            has_next_period: self.has_next_period(),
            presence: self.presence(),
        }
    }
}

impl ChartSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
