pub mod aggregated_bucket;
pub mod date_axis;
pub mod period;
pub mod primitives;
pub mod reading;
pub mod thresholds;
pub mod units;

pub use aggregated_bucket::AggregatedBucket;
pub use date_axis::{AxisBucket, AxisLabel, AxisTickLabel, DateAxis};
pub use period::{Granularity, Period};
pub use reading::{
    BloodSugarType, BloodSugarUnit, Reading, ReadingCollection, most_recent, oldest,
};
pub use thresholds::{ClinicalThresholds, ThresholdBand, ThresholdLookup};
pub use units::{StandardUnitConverter, UnitConverter};
