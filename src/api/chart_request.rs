use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::validate_month0;
use crate::core::{
    BloodSugarType, Granularity, Period, Reading, ReadingCollection, most_recent, oldest,
};
use crate::error::{ChartError, ChartResult};

const SINGLE_MONTH_VIEW: &str = "single-month";

/// One calendar month of fasting or after-eating glucose readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SingleMonthRecord")]
pub struct SingleMonthRequest {
    subtype: BloodSugarType,
    month0: u32,
    year: i32,
    readings: ReadingCollection,
}

impl SingleMonthRequest {
    /// Builds a month request; `month0` is zero-based.
    ///
    /// Only fasting, random and post-prandial subtypes have a month view.
    pub fn new(
        subtype: BloodSugarType,
        month0: u32,
        year: i32,
        readings: ReadingCollection,
    ) -> ChartResult<Self> {
        match subtype {
            BloodSugarType::Fasting | BloodSugarType::Random | BloodSugarType::PostPrandial => {}
            BloodSugarType::Hemoglobic
            | BloodSugarType::BeforeEating
            | BloodSugarType::AfterEating => {
                return Err(ChartError::UnsupportedSubtype {
                    subtype,
                    view: SINGLE_MONTH_VIEW,
                });
            }
        }

        Ok(Self {
            subtype,
            month0: validate_month0(month0)?,
            year,
            readings,
        })
    }

    /// Month of the most recent displayed reading, else the month of `today`.
    pub fn default_for(
        subtype: BloodSugarType,
        readings: ReadingCollection,
        today: NaiveDate,
    ) -> ChartResult<Self> {
        let (month0, year) = match most_recent(readings.filter_by_types(subtype.display_group())) {
            Some(reading) => {
                let at = reading.recorded_at();
                (at.month0(), at.year())
            }
            None => (today.month0(), today.year()),
        };
        Self::new(subtype, month0, year, readings)
    }

    #[must_use]
    pub fn subtype(&self) -> BloodSugarType {
        self.subtype
    }

    #[must_use]
    pub fn month0(&self) -> u32 {
        self.month0
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn readings(&self) -> &ReadingCollection {
        &self.readings
    }

    #[must_use]
    pub fn period(&self) -> Period {
        Period::Month {
            year: self.year,
            month0: self.month0,
        }
    }

    fn with_period(&self, period: Period) -> Self {
        let (year, month0) = match period {
            Period::Month { year, month0 } => (year, month0),
            Period::Year(year) => (year, self.month0),
        };
        Self {
            subtype: self.subtype,
            month0,
            year,
            readings: self.readings.clone(),
        }
    }
}

/// Unvalidated wire shape; deserialization goes through `SingleMonthRequest::new`.
#[derive(Deserialize)]
struct SingleMonthRecord {
    subtype: BloodSugarType,
    month0: u32,
    year: i32,
    readings: ReadingCollection,
}

impl TryFrom<SingleMonthRecord> for SingleMonthRequest {
    type Error = ChartError;

    fn try_from(record: SingleMonthRecord) -> ChartResult<Self> {
        Self::new(record.subtype, record.month0, record.year, record.readings)
    }
}

/// One calendar year of lab HbA1c readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemoglobicRequest {
    year: i32,
    readings: ReadingCollection,
}

impl HemoglobicRequest {
    #[must_use]
    pub fn new(year: i32, readings: ReadingCollection) -> Self {
        Self { year, readings }
    }

    /// Year of the most recent HbA1c reading, else the year of `today`.
    #[must_use]
    pub fn default_for(readings: ReadingCollection, today: NaiveDate) -> Self {
        let year = most_recent(readings.filter_by_type(BloodSugarType::Hemoglobic))
            .map_or(today.year(), |reading| reading.recorded_at().year());
        Self::new(year, readings)
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn readings(&self) -> &ReadingCollection {
        &self.readings
    }

    #[must_use]
    pub fn period(&self) -> Period {
        Period::Year(self.year)
    }
}

/// What the history chart is currently showing.
///
/// Requests are immutable: every navigation method returns a new request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartRequest {
    SingleMonth(SingleMonthRequest),
    Hemoglobic(HemoglobicRequest),
}

impl ChartRequest {
    pub fn single_month(
        subtype: BloodSugarType,
        month0: u32,
        year: i32,
        readings: ReadingCollection,
    ) -> ChartResult<Self> {
        SingleMonthRequest::new(subtype, month0, year, readings).map(Self::SingleMonth)
    }

    #[must_use]
    pub fn hemoglobic(year: i32, readings: ReadingCollection) -> Self {
        Self::Hemoglobic(HemoglobicRequest::new(year, readings))
    }

    /// Initial request for a freshly loaded dataset, relative to the local date.
    #[must_use]
    pub fn starting(readings: ReadingCollection) -> Self {
        Self::starting_at(readings, Local::now().date_naive())
    }

    /// Initial request for a dataset, falling back to `today` when empty.
    ///
    /// Glucose readings take precedence over HbA1c; an after-eating view is
    /// preferred over fasting when both exist.
    #[must_use]
    pub fn starting_at(readings: ReadingCollection, today: NaiveDate) -> Self {
        let has_after_eating = readings.has_reading_type(BloodSugarType::Random)
            || readings.has_reading_type(BloodSugarType::PostPrandial);
        let has_fasting = readings.has_reading_type(BloodSugarType::Fasting);

        let has_hemoglobic = readings.has_reading_type(BloodSugarType::Hemoglobic);
        if !has_after_eating && !has_fasting && has_hemoglobic {
            return Self::Hemoglobic(HemoglobicRequest::default_for(readings, today));
        }

        let subtype = if !has_after_eating && has_fasting {
            BloodSugarType::Fasting
        } else {
            BloodSugarType::Random
        };
        let (month0, year) = match most_recent(readings.filter_by_types(subtype.display_group())) {
            Some(reading) => (reading.recorded_at().month0(), reading.recorded_at().year()),
            None => (today.month0(), today.year()),
        };
        Self::SingleMonth(SingleMonthRequest {
            subtype,
            month0,
            year,
            readings,
        })
    }

    #[must_use]
    pub fn subtype(&self) -> BloodSugarType {
        match self {
            Self::SingleMonth(request) => request.subtype,
            Self::Hemoglobic(_) => BloodSugarType::Hemoglobic,
        }
    }

    #[must_use]
    pub fn readings(&self) -> &ReadingCollection {
        match self {
            Self::SingleMonth(request) => &request.readings,
            Self::Hemoglobic(request) => &request.readings,
        }
    }

    #[must_use]
    pub fn period(&self) -> Period {
        match self {
            Self::SingleMonth(request) => request.period(),
            Self::Hemoglobic(request) => request.period(),
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.period().granularity()
    }

    /// "March 2024" for month views, "2023" for year views.
    #[must_use]
    pub fn title(&self) -> String {
        self.period().to_string()
    }

    /// Subtypes drawn by this request.
    #[must_use]
    pub fn displayed_subtypes(&self) -> &'static [BloodSugarType] {
        self.subtype().display_group()
    }

    /// Readings shown for this request, in dataset order.
    pub fn filtered_readings(&self) -> impl Iterator<Item = &Reading> {
        self.readings()
            .filter_for_period(self.displayed_subtypes(), self.period())
    }

    /// Default request for `subtype` over `readings`, relative to the local date.
    pub fn with_subtype(
        &self,
        subtype: BloodSugarType,
        readings: ReadingCollection,
    ) -> ChartResult<Self> {
        self.with_subtype_at(subtype, readings, Local::now().date_naive())
    }

    /// Switching to HbA1c yields a yearly request; glucose subtypes yield a
    /// month request positioned on their most recent reading.
    pub fn with_subtype_at(
        &self,
        subtype: BloodSugarType,
        readings: ReadingCollection,
        today: NaiveDate,
    ) -> ChartResult<Self> {
        debug!(
            from = ?self.subtype(),
            to = ?subtype,
            count = readings.len(),
            "change chart subtype"
        );
        match subtype {
            BloodSugarType::Hemoglobic => {
                Ok(Self::Hemoglobic(HemoglobicRequest::default_for(readings, today)))
            }
            _ => SingleMonthRequest::default_for(subtype, readings, today).map(Self::SingleMonth),
        }
    }

    /// Same view and period over a new dataset snapshot.
    #[must_use]
    pub fn with_readings(&self, readings: ReadingCollection) -> Self {
        match self {
            Self::SingleMonth(request) => Self::SingleMonth(SingleMonthRequest {
                subtype: request.subtype,
                month0: request.month0,
                year: request.year,
                readings,
            }),
            Self::Hemoglobic(request) => Self::Hemoglobic(HemoglobicRequest {
                year: request.year,
                readings,
            }),
        }
    }

    #[must_use]
    pub fn next_period(&self) -> Self {
        self.with_period(self.period().next())
    }

    #[must_use]
    pub fn previous_period(&self) -> Self {
        self.with_period(self.period().previous())
    }

    fn with_period(&self, period: Period) -> Self {
        match self {
            Self::SingleMonth(request) => Self::SingleMonth(request.with_period(period)),
            Self::Hemoglobic(request) => {
                Self::Hemoglobic(HemoglobicRequest::new(period.year(), request.readings.clone()))
            }
        }
    }

    /// `true` when the oldest reading of this subtype lies in an earlier period.
    #[must_use]
    pub fn has_previous_period(&self) -> bool {
        let period = self.period();
        oldest(self.readings().filter_by_type(self.subtype()))
            .is_some_and(|reading| period.same_kind_containing(reading.recorded_at()) < period)
    }

    /// `true` when the most recent reading of this subtype lies in a later period.
    #[must_use]
    pub fn has_next_period(&self) -> bool {
        let period = self.period();
        most_recent(self.readings().filter_by_type(self.subtype()))
            .is_some_and(|reading| period.same_kind_containing(reading.recorded_at()) > period)
    }
}
