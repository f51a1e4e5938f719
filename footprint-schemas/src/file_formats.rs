use crate::{factor::EmissionFactor, range::PlausibilityRange};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FactorFile {
    pub schema_version: String,
    pub factors: Vec<EmissionFactor>,
}

#[derive(Debug, Deserialize)]
pub struct RangeFile {
    pub schema_version: String,
    pub ranges: Vec<PlausibilityRange>,
}
