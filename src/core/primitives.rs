use chrono::{Month, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Validates a zero-based month (`0..=11`).
pub fn validate_month0(month0: u32) -> ChartResult<u32> {
    if month0 > 11 {
        return Err(ChartError::InvalidData(format!(
            "month must be within 0..=11, got {month0}"
        )));
    }
    Ok(month0)
}

/// First calendar day of a zero-based month.
pub fn first_day_of_month(year: i32, month0: u32) -> ChartResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or_else(|| {
        ChartError::InvalidData(format!("year {year} month {month0} is not representable"))
    })
}

/// Number of days in a zero-based month, leap-year aware.
pub fn days_in_month(year: i32, month0: u32) -> ChartResult<u32> {
    let first = first_day_of_month(year, month0)?;
    let next = if month0 == 11 {
        first_day_of_month(year + 1, 0)?
    } else {
        first_day_of_month(year, month0 + 1)?
    };
    Ok(next.signed_duration_since(first).num_days() as u32)
}

#[must_use]
pub fn month_name(month0: u32) -> &'static str {
    month0
        .checked_add(1)
        .and_then(|month| u8::try_from(month).ok())
        .and_then(|month| Month::try_from(month).ok())
        .map_or("", |month| month.name())
}

#[must_use]
pub fn month_abbreviation(month0: u32) -> &'static str {
    let name = month_name(month0);
    name.get(..3).unwrap_or(name)
}
