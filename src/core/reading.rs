use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::core::{Period, UnitConverter};
use crate::error::{ChartError, ChartResult};

/// Clinical category of a blood sugar reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodSugarType {
    Random,
    PostPrandial,
    Fasting,
    /// Lab HbA1c average, charted per year.
    #[serde(rename = "hba1c")]
    Hemoglobic,
    BeforeEating,
    AfterEating,
}

impl BloodSugarType {
    /// Subtypes sharing one display when a single month is charted.
    ///
    /// Random and post-prandial readings are both "after eating" values.
    #[must_use]
    pub fn display_group(self) -> &'static [BloodSugarType] {
        match self {
            Self::Random | Self::PostPrandial => &[Self::Random, Self::PostPrandial],
            Self::Fasting => &[Self::Fasting],
            Self::Hemoglobic => &[Self::Hemoglobic],
            Self::BeforeEating => &[Self::BeforeEating],
            Self::AfterEating => &[Self::AfterEating],
        }
    }
}

/// Unit tag carried by every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BloodSugarUnit {
    #[default]
    #[serde(rename = "mg/dL")]
    MgDl,
    #[serde(rename = "mmol/L")]
    MmolL,
    #[serde(rename = "%")]
    Percent,
}

impl BloodSugarUnit {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MgDl => "mg/dL",
            Self::MmolL => "mmol/L",
            Self::Percent => "%",
        }
    }
}

impl fmt::Display for BloodSugarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One timestamped clinical measurement.
///
/// The value arrives as text; it is validated as a decimal when the reading is
/// created so later numeric comparisons cannot fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReadingRecord", into = "ReadingRecord")]
pub struct Reading {
    subtype: BloodSugarType,
    value_text: String,
    value: f64,
    unit: BloodSugarUnit,
    recorded_at: NaiveDateTime,
}

impl Reading {
    pub fn new(
        subtype: BloodSugarType,
        value_text: impl Into<String>,
        unit: BloodSugarUnit,
        recorded_at: NaiveDateTime,
    ) -> ChartResult<Self> {
        let value_text = value_text.into();
        let decimal = Decimal::from_str(value_text.trim()).map_err(|e| {
            ChartError::InvalidData(format!("reading value {value_text:?} is not numeric: {e}"))
        })?;
        let value = decimal_to_f64(decimal, "reading value")?;

        Ok(Self {
            subtype,
            value_text,
            value,
            unit,
            recorded_at,
        })
    }

    #[must_use]
    pub fn subtype(&self) -> BloodSugarType {
        self.subtype
    }

    #[must_use]
    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn unit(&self) -> BloodSugarUnit {
        self.unit
    }

    #[must_use]
    pub fn recorded_at(&self) -> NaiveDateTime {
        self.recorded_at
    }

    /// Returns a copy of this reading rescaled into `unit`.
    pub fn converted_to(
        &self,
        unit: BloodSugarUnit,
        converter: &dyn UnitConverter,
    ) -> ChartResult<Self> {
        let value = converter.convert(self.value, self.subtype, self.unit, unit)?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData(
                "converted reading value must be finite".to_owned(),
            ));
        }
        let unit = if self.subtype == BloodSugarType::Hemoglobic {
            self.unit
        } else {
            unit
        };
        Ok(Self {
            subtype: self.subtype,
            value_text: value.to_string(),
            value,
            unit,
            recorded_at: self.recorded_at,
        })
    }
}

/// Wire shape of a reading as synced from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReadingRecord {
    blood_sugar_type: BloodSugarType,
    blood_sugar_value: String,
    #[serde(default)]
    blood_sugar_unit: Option<BloodSugarUnit>,
    recorded_at: NaiveDateTime,
}

impl TryFrom<ReadingRecord> for Reading {
    type Error = ChartError;

    fn try_from(record: ReadingRecord) -> ChartResult<Self> {
        Self::new(
            record.blood_sugar_type,
            record.blood_sugar_value,
            record.blood_sugar_unit.unwrap_or_default(),
            record.recorded_at,
        )
    }
}

impl From<Reading> for ReadingRecord {
    fn from(reading: Reading) -> Self {
        Self {
            blood_sugar_type: reading.subtype,
            blood_sugar_value: reading.value_text,
            blood_sugar_unit: Some(reading.unit),
            recorded_at: reading.recorded_at,
        }
    }
}

/// Shared, immutable snapshot of a patient's readings.
///
/// Cloning only bumps a reference count, so requests can hand the same
/// dataset from one navigation state to the next.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingCollection {
    readings: Arc<[Reading]>,
}

impl ReadingCollection {
    #[must_use]
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings: readings.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// `true` when both collections share the same underlying snapshot.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.readings, &other.readings)
    }

    #[must_use]
    pub fn has_reading_type(&self, subtype: BloodSugarType) -> bool {
        self.readings.iter().any(|reading| reading.subtype == subtype)
    }

    pub fn filter_by_type(&self, subtype: BloodSugarType) -> impl Iterator<Item = &Reading> {
        self.readings
            .iter()
            .filter(move |reading| reading.subtype == subtype)
    }

    pub fn filter_by_types<'a>(
        &'a self,
        subtypes: &'a [BloodSugarType],
    ) -> impl Iterator<Item = &'a Reading> + 'a {
        self.readings
            .iter()
            .filter(move |reading| subtypes.contains(&reading.subtype))
    }

    /// Readings of `subtypes` whose timestamp falls in `period`, in dataset order.
    pub fn filter_for_period<'a>(
        &'a self,
        subtypes: &'a [BloodSugarType],
        period: Period,
    ) -> impl Iterator<Item = &'a Reading> + 'a {
        self.filter_by_types(subtypes)
            .filter(move |reading| period.contains(reading.recorded_at))
    }

    pub fn filter_for_year(&self, year: i32) -> impl Iterator<Item = &Reading> {
        self.filter_all_in(Period::Year(year))
    }

    pub fn filter_for_month_and_year(
        &self,
        month0: u32,
        year: i32,
    ) -> impl Iterator<Item = &Reading> {
        self.filter_all_in(Period::Month { year, month0 })
    }

    fn filter_all_in(&self, period: Period) -> impl Iterator<Item = &Reading> {
        self.readings
            .iter()
            .filter(move |reading| period.contains(reading.recorded_at))
    }

    /// Returns a new snapshot with every reading rescaled into `unit`.
    pub fn converted_to(
        &self,
        unit: BloodSugarUnit,
        converter: &dyn UnitConverter,
    ) -> ChartResult<Self> {
        let converted = self
            .readings
            .iter()
            .map(|reading| reading.converted_to(unit, converter))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self::new(converted))
    }
}

impl From<Vec<Reading>> for ReadingCollection {
    fn from(readings: Vec<Reading>) -> Self {
        Self::new(readings)
    }
}

impl<'a> IntoIterator for &'a ReadingCollection {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

/// Earliest reading; on equal timestamps the first one seen wins.
pub fn oldest<'a, I>(readings: I) -> Option<&'a Reading>
where
    I: IntoIterator<Item = &'a Reading>,
{
    readings.into_iter().fold(None, |memo, current| match memo {
        Some(best) if current.recorded_at >= best.recorded_at => Some(best),
        _ => Some(current),
    })
}

/// Latest reading; on equal timestamps the first one seen wins.
pub fn most_recent<'a, I>(readings: I) -> Option<&'a Reading>
where
    I: IntoIterator<Item = &'a Reading>,
{
    readings.into_iter().fold(None, |memo, current| match memo {
        Some(best) if current.recorded_at <= best.recorded_at => Some(best),
        _ => Some(current),
    })
}
