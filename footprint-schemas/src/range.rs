use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Numeric fields a form can supply, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldId {
    #[serde(rename = "carKm")]
    CarKm,
    #[serde(rename = "publicTransitKm")]
    PublicTransitKm,
    #[serde(rename = "shortFlights")]
    ShortFlights,
    #[serde(rename = "longFlights")]
    LongFlights,
    #[serde(rename = "distance")]
    TripDistance,
    #[serde(rename = "electricityKwh")]
    ElectricityKwh,
    #[serde(rename = "naturalGasTherm")]
    NaturalGasTherm,
    #[serde(rename = "ac")]
    AcHours,
    #[serde(rename = "fan")]
    FanHours,
    #[serde(rename = "refrigerator")]
    RefrigeratorHours,
    #[serde(rename = "meatKg")]
    MeatKg,
    #[serde(rename = "dairyKg")]
    DairyKg,
    #[serde(rename = "beef")]
    BeefKg,
    #[serde(rename = "chicken")]
    ChickenKg,
    #[serde(rename = "rice")]
    RiceKg,
    #[serde(rename = "wheat")]
    WheatKg,
    #[serde(rename = "cottonKg")]
    CottonKg,
    #[serde(rename = "silkKg")]
    SilkKg,
    #[serde(rename = "polyesterKg")]
    PolyesterKg,
}

impl FieldId {
    pub const ALL: [FieldId; 19] = [
        FieldId::CarKm,
        FieldId::PublicTransitKm,
        FieldId::ShortFlights,
        FieldId::LongFlights,
        FieldId::TripDistance,
        FieldId::ElectricityKwh,
        FieldId::NaturalGasTherm,
        FieldId::AcHours,
        FieldId::FanHours,
        FieldId::RefrigeratorHours,
        FieldId::MeatKg,
        FieldId::DairyKg,
        FieldId::BeefKg,
        FieldId::ChickenKg,
        FieldId::RiceKg,
        FieldId::WheatKg,
        FieldId::CottonKg,
        FieldId::SilkKg,
        FieldId::PolyesterKg,
    ];

    /// The form identifier, matching the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::CarKm => "carKm",
            FieldId::PublicTransitKm => "publicTransitKm",
            FieldId::ShortFlights => "shortFlights",
            FieldId::LongFlights => "longFlights",
            FieldId::TripDistance => "distance",
            FieldId::ElectricityKwh => "electricityKwh",
            FieldId::NaturalGasTherm => "naturalGasTherm",
            FieldId::AcHours => "ac",
            FieldId::FanHours => "fan",
            FieldId::RefrigeratorHours => "refrigerator",
            FieldId::MeatKg => "meatKg",
            FieldId::DairyKg => "dairyKg",
            FieldId::BeefKg => "beef",
            FieldId::ChickenKg => "chicken",
            FieldId::RiceKg => "rice",
            FieldId::WheatKg => "wheat",
            FieldId::CottonKg => "cottonKg",
            FieldId::SilkKg => "silkKg",
            FieldId::PolyesterKg => "polyesterKg",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Statistically plausible bounds for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlausibilityRange {
    pub field: FieldId,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub warning: f64,
    /// Display unit used in messages, e.g. `km/week`.
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: FieldId,
    pub message: String,
    pub severity: Severity,
}
