use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    AggregatedBucket, AxisLabel, AxisTickLabel, BloodSugarType, BloodSugarUnit,
    ClinicalThresholds, DateAxis, Reading, StandardUnitConverter, ThresholdBand, ThresholdLookup,
    UnitConverter, most_recent,
};
use crate::error::ChartResult;

use super::{ChartDataConfig, ChartRequest};

/// One individual reading placed on the axis; `value` is in the display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub index: usize,
    pub value: f64,
    pub subtype: BloodSugarType,
    pub recorded_at: NaiveDateTime,
    pub is_out_of_range: bool,
    pub shows_warning: bool,
}

/// Vertical min/max band for a bucket holding distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxBand {
    pub index: usize,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub index: usize,
    pub value: f64,
}

/// Subtypes present anywhere in the unfiltered dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubtypePresence {
    pub random: bool,
    pub post_prandial: bool,
    pub fasting: bool,
    pub hemoglobic: bool,
}

/// Aggregated, read-only view of one chart request.
///
/// Everything is computed at construction; a changed request or dataset
/// means building a new `ChartData`. Plotted values, extrema and the domain
/// are all expressed in the configured display unit. HbA1c stays in percent.
#[derive(Debug, Clone)]
pub struct ChartData<'a> {
    request: &'a ChartRequest,
    config: ChartDataConfig,
    presence: SubtypePresence,
    axis: DateAxis,
    buckets: IndexMap<usize, AggregatedBucket<'a>>,
    scatter: Vec<ScatterPoint>,
    line: Vec<LinePoint>,
    display_thresholds: ThresholdBand,
    filtered_count: usize,
    dropped_count: usize,
}

impl<'a> ChartData<'a> {
    /// Builds with default config, clinical thresholds and unit conversion.
    pub fn new(request: &'a ChartRequest) -> ChartResult<Self> {
        Self::with_config(request, ChartDataConfig::default())
    }

    pub fn with_config(request: &'a ChartRequest, config: ChartDataConfig) -> ChartResult<Self> {
        Self::build(request, config, &ClinicalThresholds, &StandardUnitConverter)
    }

    /// Runs the full pipeline: presence flags, filtering, axis, bucketing.
    pub fn build(
        request: &'a ChartRequest,
        config: ChartDataConfig,
        thresholds: &dyn ThresholdLookup,
        converter: &dyn UnitConverter,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        let readings = request.readings();

        let presence = SubtypePresence {
            random: readings.has_reading_type(BloodSugarType::Random),
            post_prandial: readings.has_reading_type(BloodSugarType::PostPrandial),
            fasting: readings.has_reading_type(BloodSugarType::Fasting),
            hemoglobic: readings.has_reading_type(BloodSugarType::Hemoglobic),
        };

        let axis = DateAxis::for_period(request.period())?;
        let mut buckets: IndexMap<usize, AggregatedBucket<'a>> = IndexMap::new();
        let mut filtered_count = 0;
        let mut dropped_count = 0;

        for reading in request.filtered_readings() {
            filtered_count += 1;
            let Some(axis_bucket) = axis.bucket_for(reading) else {
                dropped_count += 1;
                warn!(
                    recorded_at = %reading.recorded_at(),
                    period = %axis.period(),
                    "reading outside axis period dropped"
                );
                continue;
            };

            let value = display_value(reading, config.display_unit, converter)?;
            buckets
                .entry(axis_bucket.index())
                .or_insert_with(|| {
                    trace!(index = axis_bucket.index(), "create aggregated bucket");
                    AggregatedBucket::new(axis_bucket.clone())
                })
                .add_reading_as(reading, value);
        }
        buckets.sort_keys();

        let mut scatter = Vec::with_capacity(filtered_count);
        for bucket in buckets.values() {
            for reading in bucket.readings() {
                let band = thresholds.thresholds_for(reading.subtype()).converted_to(
                    reading.unit(),
                    reading.subtype(),
                    converter,
                )?;
                scatter.push(ScatterPoint {
                    index: bucket.index(),
                    value: display_value(reading, config.display_unit, converter)?,
                    subtype: reading.subtype(),
                    recorded_at: reading.recorded_at(),
                    is_out_of_range: band.is_out_of_range(reading.value()),
                    shows_warning: band.shows_warning(reading.value()),
                });
            }
        }

        let mut line = Vec::new();
        if request.subtype() == BloodSugarType::Hemoglobic {
            for bucket in buckets.values() {
                if let Some(latest) = most_recent(bucket.readings().iter().copied()) {
                    line.push(LinePoint {
                        index: bucket.index(),
                        value: display_value(latest, config.display_unit, converter)?,
                    });
                }
            }
        }

        let display_thresholds = thresholds
            .thresholds_for(request.subtype())
            .converted_to(config.display_unit, request.subtype(), converter)?;

        debug!(
            subtype = ?request.subtype(),
            period = %request.period(),
            filtered = filtered_count,
            buckets = buckets.len(),
            dropped = dropped_count,
            "chart data built"
        );

        Ok(Self {
            request,
            config,
            presence,
            axis,
            buckets,
            scatter,
            line,
            display_thresholds,
            filtered_count,
            dropped_count,
        })
    }

    #[must_use]
    pub fn request(&self) -> &'a ChartRequest {
        self.request
    }

    #[must_use]
    pub fn config(&self) -> ChartDataConfig {
        self.config
    }

    #[must_use]
    pub fn subtype(&self) -> BloodSugarType {
        self.request.subtype()
    }

    #[must_use]
    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    /// Non-empty buckets in axis order.
    pub fn buckets(&self) -> impl Iterator<Item = &AggregatedBucket<'a>> {
        self.buckets.values()
    }

    #[must_use]
    pub fn bucket_at(&self, index: usize) -> Option<&AggregatedBucket<'a>> {
        self.buckets.get(&index)
    }

    /// Readings that passed the request filter.
    #[must_use]
    pub fn filtered_reading_count(&self) -> usize {
        self.filtered_count
    }

    /// Filtered readings that matched no axis bucket.
    #[must_use]
    pub fn dropped_reading_count(&self) -> usize {
        self.dropped_count
    }

    #[must_use]
    pub fn presence(&self) -> SubtypePresence {
        self.presence
    }

    #[must_use]
    pub fn has_random_readings(&self) -> bool {
        self.presence.random
    }

    #[must_use]
    pub fn has_post_prandial_readings(&self) -> bool {
        self.presence.post_prandial
    }

    #[must_use]
    pub fn has_fasting_readings(&self) -> bool {
        self.presence.fasting
    }

    #[must_use]
    pub fn has_hemoglobic_readings(&self) -> bool {
        self.presence.hemoglobic
    }

    /// One point per reading, in axis order then dataset order.
    #[must_use]
    pub fn scatter_points(&self) -> &[ScatterPoint] {
        &self.scatter
    }

    /// Buckets whose minimum and maximum differ.
    #[must_use]
    pub fn min_max_bands(&self) -> Vec<MinMaxBand> {
        self.buckets
            .values()
            .filter_map(|bucket| {
                let (min, max) = bucket.band()?;
                Some(MinMaxBand {
                    index: bucket.index(),
                    min,
                    max,
                })
            })
            .collect()
    }

    /// Month-by-month HbA1c line; empty for glucose views.
    ///
    /// A month with several lab results is plotted at its latest one.
    #[must_use]
    pub fn line_series(&self) -> Vec<LinePoint> {
        self.line.clone()
    }

    /// Lowest bucket minimum, in the display unit.
    #[must_use]
    pub fn overall_min(&self) -> Option<f64> {
        self.buckets
            .values()
            .filter_map(AggregatedBucket::min_value)
            .reduce(f64::min)
    }

    /// Highest bucket maximum, in the display unit.
    #[must_use]
    pub fn overall_max(&self) -> Option<f64> {
        self.buckets
            .values()
            .filter_map(AggregatedBucket::max_value)
            .reduce(f64::max)
    }

    /// Reference band of the active subtype in the configured display unit.
    #[must_use]
    pub fn thresholds(&self) -> ThresholdBand {
        self.display_thresholds
    }

    /// Top of the value axis: the high threshold (or data above it) plus headroom.
    #[must_use]
    pub fn domain_ceiling(&self) -> f64 {
        let threshold = self.display_thresholds.high;
        let base = self
            .overall_max()
            .map_or(threshold, |max| max.max(threshold));
        base + threshold * self.config.headroom_ratio
    }

    /// Bottom of the value axis: the low threshold (or data below it) minus headroom.
    ///
    /// Bands without a low bound anchor on their high threshold.
    #[must_use]
    pub fn domain_floor(&self) -> f64 {
        let threshold = self
            .display_thresholds
            .low
            .unwrap_or(self.display_thresholds.high);
        let base = self
            .overall_min()
            .map_or(threshold, |min| min.min(threshold));
        let floor = base - threshold * self.config.headroom_ratio;
        if self.config.clamp_floor_at_zero {
            floor.max(0.0)
        } else {
            floor
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.request.title()
    }

    #[must_use]
    pub fn has_previous_period(&self) -> bool {
        self.request.has_previous_period()
    }

    #[must_use]
    pub fn has_next_period(&self) -> bool {
        self.request.has_next_period()
    }

    #[must_use]
    pub fn index_values(&self) -> Vec<usize> {
        self.axis.index_values()
    }

    #[must_use]
    pub fn axis_labels(&self) -> Vec<AxisTickLabel> {
        self.axis.axis_labels().into_vec()
    }

    #[must_use]
    pub fn bucket_labels(&self) -> Vec<&AxisLabel> {
        self.axis.bucket_labels()
    }
}

/// Reading value rescaled into the chart's display unit.
fn display_value(
    reading: &Reading,
    unit: BloodSugarUnit,
    converter: &dyn UnitConverter,
) -> ChartResult<f64> {
    if reading.subtype() == BloodSugarType::Hemoglobic {
        return Ok(reading.value());
    }
    converter.convert(reading.value(), reading.subtype(), reading.unit(), unit)
}
