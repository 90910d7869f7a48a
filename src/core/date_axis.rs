use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::primitives::{
    days_in_month, first_day_of_month, month_abbreviation, validate_month0,
};
use crate::core::{Period, Reading};
use crate::error::{ChartError, ChartResult};

/// Two-line tick label: month name over year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisLabel {
    pub primary: String,
    pub secondary: String,
}

/// One discrete time slot on the axis.
///
/// Covers the half-open date range `[start, end)`. `index` is both the
/// x-coordinate used for charting and the bucket's position on its axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBucket {
    index: usize,
    start: NaiveDate,
    end: NaiveDate,
    label: AxisLabel,
}

impl AxisBucket {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn label(&self) -> &AxisLabel {
        &self.label
    }

    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let date = timestamp.date();
        date >= self.start && date < self.end
    }
}

/// Grouped tick label covering a run of consecutive buckets with the same
/// primary label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTickLabel {
    /// Index of the first bucket in the run.
    pub index: usize,
    /// Number of buckets in the run.
    pub span: usize,
    pub primary: String,
    pub secondary: String,
}

/// Ordered, contiguous buckets covering exactly one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateAxis {
    period: Period,
    buckets: Vec<AxisBucket>,
}

impl DateAxis {
    /// One day bucket per calendar day of `month0` (0-based) in `year`.
    pub fn create_for_month(month0: u32, year: i32) -> ChartResult<Self> {
        let month0 = validate_month0(month0)?;
        let first = first_day_of_month(year, month0)?;
        let day_count = days_in_month(year, month0)?;
        let label = AxisLabel {
            primary: month_abbreviation(month0).to_owned(),
            secondary: year.to_string(),
        };

        let mut buckets = Vec::with_capacity(day_count as usize);
        for (index, start) in first.iter_days().take(day_count as usize).enumerate() {
            let end = start.succ_opt().ok_or_else(|| {
                ChartError::InvalidData(format!("day after {start} is not representable"))
            })?;
            buckets.push(AxisBucket {
                index,
                start,
                end,
                label: label.clone(),
            });
        }

        Ok(Self {
            period: Period::Month { year, month0 },
            buckets,
        })
    }

    /// Exactly twelve month buckets for `year`.
    pub fn create_for_year(year: i32) -> ChartResult<Self> {
        let mut buckets = Vec::with_capacity(12);
        for month0 in 0..12u32 {
            let start = first_day_of_month(year, month0)?;
            let end = start.checked_add_months(Months::new(1)).ok_or_else(|| {
                ChartError::InvalidData(format!("month after {start} is not representable"))
            })?;
            buckets.push(AxisBucket {
                index: month0 as usize,
                start,
                end,
                label: AxisLabel {
                    primary: month_abbreviation(month0).to_owned(),
                    secondary: year.to_string(),
                },
            });
        }

        Ok(Self {
            period: Period::Year(year),
            buckets,
        })
    }

    pub fn for_period(period: Period) -> ChartResult<Self> {
        match period {
            Period::Month { year, month0 } => Self::create_for_month(month0, year),
            Period::Year(year) => Self::create_for_year(year),
        }
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[must_use]
    pub fn ordered_buckets(&self) -> &[AxisBucket] {
        &self.buckets
    }

    /// Bucket whose date range holds the reading, or `None` outside the period.
    #[must_use]
    pub fn bucket_for(&self, reading: &Reading) -> Option<&AxisBucket> {
        self.bucket_for_timestamp(reading.recorded_at())
    }

    #[must_use]
    pub fn bucket_for_timestamp(&self, timestamp: NaiveDateTime) -> Option<&AxisBucket> {
        if !self.period.contains(timestamp) {
            return None;
        }
        let index = match self.period {
            Period::Month { .. } => timestamp.day0() as usize,
            Period::Year(_) => timestamp.month0() as usize,
        };
        self.buckets
            .get(index)
            .filter(|bucket| bucket.contains(timestamp))
    }

    /// Every axis position, for grid ticks.
    #[must_use]
    pub fn index_values(&self) -> Vec<usize> {
        self.buckets.iter().map(AxisBucket::index).collect()
    }

    /// Raw per-bucket label pairs in axis order.
    #[must_use]
    pub fn bucket_labels(&self) -> Vec<&AxisLabel> {
        self.buckets.iter().map(AxisBucket::label).collect()
    }

    /// Tick labels with consecutive duplicate primaries collapsed into runs.
    #[must_use]
    pub fn axis_labels(&self) -> SmallVec<[AxisTickLabel; 12]> {
        let mut labels: SmallVec<[AxisTickLabel; 12]> = SmallVec::new();
        for bucket in &self.buckets {
            if let Some(run) = labels.last_mut()
                && run.primary == bucket.label.primary
                && run.secondary == bucket.label.secondary
            {
                run.span += 1;
                continue;
            }
            labels.push(AxisTickLabel {
                index: bucket.index,
                span: 1,
                primary: bucket.label.primary.clone(),
                secondary: bucket.label.secondary.clone(),
            });
        }
        labels
    }
}
