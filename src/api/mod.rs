mod chart_config;
mod chart_data;
mod chart_request;
mod json_contract;

pub use chart_config::ChartDataConfig;
pub use chart_data::{ChartData, LinePoint, MinMaxBand, ScatterPoint, SubtypePresence};
pub use chart_request::{ChartRequest, HemoglobicRequest, SingleMonthRequest};
pub use json_contract::{
    CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1,
};
