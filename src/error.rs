use thiserror::Error;

use crate::core::{BloodSugarType, BloodSugarUnit};

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The requested view has no filtering/axis rule for this subtype.
    #[error("subtype {subtype:?} cannot be charted in a {view} view")]
    UnsupportedSubtype {
        subtype: BloodSugarType,
        view: &'static str,
    },

    #[error("cannot convert {subtype:?} reading from {from} to {to}")]
    UnsupportedUnitConversion {
        subtype: BloodSugarType,
        from: BloodSugarUnit,
        to: BloodSugarUnit,
    },
}
