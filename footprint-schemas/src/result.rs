use crate::activity::{ActivityInput, Category};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassUnit {
    #[default]
    Kilograms,
    Tonnes,
}

impl MassUnit {
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            MassUnit::Kilograms => kg,
            MassUnit::Tonnes => kg / 1000.0,
        }
    }

    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            MassUnit::Kilograms => value,
            MassUnit::Tonnes => value * 1000.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Kilograms => "kg",
            MassUnit::Tonnes => "t",
        }
    }
}

/// Figures shown while a category is still being filled in. Never part of the total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecondaryMetrics {
    /// Emissions avoided by the logged trip versus its comparison mode. Negative when worse.
    pub trip_savings: Option<f64>,
    pub daily_appliance: Option<f64>,
    pub weekly_food: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub unit: MassUnit,
    /// Total rounded to two decimals.
    pub total: f64,
    /// Unrounded total rounded once to the nearest integer for headline display.
    pub headline_total: i64,
    /// Unrounded total in kilograms, whatever `unit` reports in.
    pub total_kg: f64,
    pub breakdown: BTreeMap<Category, f64>,
    pub secondary: SecondaryMetrics,
}

/// An immutable history entry handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub user_id: Option<String>,
    pub calculated_at: String,
    pub inputs: ActivityInput,
    pub result: CalculationResult,
}
