use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{month_name, validate_month0};
use crate::error::{ChartError, ChartResult};

/// Axis granularity of a chart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// One bucket per calendar day of a month.
    Day,
    /// One bucket per calendar month of a year.
    Month,
}

/// Calendar span currently selected for viewing.
///
/// Ordering compares the calendar start of each period; month periods sort
/// by `(year, month0)` and year periods by year. A year sorts after the
/// January sharing its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodRecord")]
pub enum Period {
    Month { year: i32, month0: u32 },
    Year(i32),
}

impl Period {
    /// Period of `granularity` size that contains `timestamp`.
    #[must_use]
    pub fn of(timestamp: NaiveDateTime, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Self::Month {
                year: timestamp.year(),
                month0: timestamp.month0(),
            },
            Granularity::Month => Self::Year(timestamp.year()),
        }
    }

    /// Same-sized period containing `timestamp`.
    #[must_use]
    pub fn same_kind_containing(self, timestamp: NaiveDateTime) -> Self {
        Self::of(timestamp, self.granularity())
    }

    #[must_use]
    pub fn granularity(self) -> Granularity {
        match self {
            Self::Month { .. } => Granularity::Day,
            Self::Year(_) => Granularity::Month,
        }
    }

    #[must_use]
    pub fn year(self) -> i32 {
        match self {
            Self::Month { year, .. } | Self::Year(year) => year,
        }
    }

    #[must_use]
    pub fn contains(self, timestamp: NaiveDateTime) -> bool {
        match self {
            Self::Month { year, month0 } => {
                timestamp.year() == year && timestamp.month0() == month0
            }
            Self::Year(year) => timestamp.year() == year,
        }
    }

    /// Following period, wrapping December into January of the next year.
    ///
    /// Stays put at the last representable year.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Month { year, month0 } if month0 >= 11 => match year.checked_add(1) {
                Some(year) => Self::Month { year, month0: 0 },
                None => self,
            },
            Self::Month { year, month0 } => Self::Month {
                year,
                month0: month0 + 1,
            },
            Self::Year(year) => year.checked_add(1).map_or(self, Self::Year),
        }
    }

    /// Preceding period, wrapping January into December of the previous year.
    ///
    /// Stays put at the first representable year.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::Month { year, month0: 0 } => match year.checked_sub(1) {
                Some(year) => Self::Month { year, month0: 11 },
                None => self,
            },
            Self::Month { year, month0 } => Self::Month {
                year,
                month0: month0 - 1,
            },
            Self::Year(year) => year.checked_sub(1).map_or(self, Self::Year),
        }
    }

    fn sort_key(self) -> (i32, u32, u8) {
        match self {
            Self::Month { year, month0 } => (year, month0, 0),
            Self::Year(year) => (year, 0, 1),
        }
    }
}

#[derive(Deserialize)]
enum PeriodRecord {
    Month { year: i32, month0: u32 },
    Year(i32),
}

impl TryFrom<PeriodRecord> for Period {
    type Error = ChartError;

    fn try_from(record: PeriodRecord) -> ChartResult<Self> {
        Ok(match record {
            PeriodRecord::Month { year, month0 } => Self::Month {
                year,
                month0: validate_month0(month0)?,
            },
            PeriodRecord::Year(year) => Self::Year(year),
        })
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month0 } => write!(f, "{} {year}", month_name(*month0)),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}
