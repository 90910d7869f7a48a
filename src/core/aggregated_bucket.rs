use crate::core::{AxisBucket, Reading};

/// Readings that landed in one axis bucket, with running extrema.
///
/// The first reading added becomes both minimum and maximum. Later readings
/// replace an extremum only on strict inequality, so the first reading seen
/// with the extreme value is the one reported.
///
/// Extrema are compared on one common unit. [`AggregatedBucket::add_reading`]
/// uses the recorded value and so assumes every reading shares a unit;
/// mixed-unit buckets go through [`AggregatedBucket::add_reading_as`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedBucket<'a> {
    bucket: AxisBucket,
    readings: Vec<&'a Reading>,
    min: Option<Extremum<'a>>,
    max: Option<Extremum<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extremum<'a> {
    reading: &'a Reading,
    value: f64,
}

impl<'a> AggregatedBucket<'a> {
    #[must_use]
    pub fn new(bucket: AxisBucket) -> Self {
        Self {
            bucket,
            readings: Vec::new(),
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &AxisBucket {
        &self.bucket
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.bucket.index()
    }

    pub fn add_reading(&mut self, reading: &'a Reading) {
        self.add_reading_as(reading, reading.value());
    }

    /// Adds `reading`, comparing it by `value` (its measurement in the
    /// bucket's common unit).
    pub fn add_reading_as(&mut self, reading: &'a Reading, value: f64) {
        self.readings.push(reading);

        let candidate = Extremum { reading, value };
        match self.min {
            Some(current) if current.value <= value => {}
            _ => self.min = Some(candidate),
        }
        match self.max {
            Some(current) if current.value >= value => {}
            _ => self.max = Some(candidate),
        }
    }

    /// Readings in insertion (dataset) order.
    #[must_use]
    pub fn readings(&self) -> &[&'a Reading] {
        &self.readings
    }

    #[must_use]
    pub fn min(&self) -> Option<&'a Reading> {
        self.min.map(|extremum| extremum.reading)
    }

    #[must_use]
    pub fn max(&self) -> Option<&'a Reading> {
        self.max.map(|extremum| extremum.reading)
    }

    /// Compared value of the minimum.
    #[must_use]
    pub fn min_value(&self) -> Option<f64> {
        self.min.map(|extremum| extremum.value)
    }

    /// Compared value of the maximum.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.max.map(|extremum| extremum.value)
    }

    /// `(min, max)` values when the bucket holds at least two distinct values.
    #[must_use]
    pub fn band(&self) -> Option<(f64, f64)> {
        let (min, max) = (self.min_value()?, self.max_value()?);
        (min != max).then_some((min, max))
    }
}
