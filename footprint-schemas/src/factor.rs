use crate::activity::Period;
use serde::{Deserialize, Serialize};

/// What one unit of activity is measured in for a given coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorUnit {
    /// kg CO2e per km travelled.
    PerKm,
    /// kg CO2e per kWh of electricity.
    PerKwh,
    /// kg CO2e per therm of natural gas.
    PerTherm,
    /// kg CO2e per kg of goods.
    PerKg,
    /// Appliance power draw in kW, converted to kWh with hours of use.
    Kilowatt,
    /// Absolute kg CO2e over the period.
    Kilograms,
    /// Dimensionless scaling of another coefficient.
    Multiplier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub activity: String,
    pub period: Period,
    pub value: f64,
    pub unit: FactorUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
