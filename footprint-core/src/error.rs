use footprint_schemas::{activity::Period, factor::FactorUnit, range::FieldId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("Factor '{activity}' ({period:?}) is already defined in {existing:?}, refusing to redefine it in {requested:?}")]
    ConflictingFactor {
        activity: String,
        period: Period,
        existing: FactorUnit,
        requested: FactorUnit,
    },

    #[error("Factor '{activity}' ({period:?}) has an invalid value {value}")]
    InvalidFactor {
        activity: String,
        period: Period,
        value: f64,
    },

    #[error("Range for '{field}' is inconsistent: {reason}")]
    InvalidRange { field: FieldId, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
