//! bs-history: aggregation engine for blood sugar history charts.
//!
//! A [`ChartRequest`] names what is being viewed (a month of glucose
//! readings or a year of HbA1c results). [`ChartData`] turns it into a date
//! axis, per-bucket min/max aggregates and render-ready series.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ChartData, ChartDataConfig, ChartRequest};
pub use error::{ChartError, ChartResult};
