//! Emission-factor tables keyed by `(activity, period)`.
//!
//! The period on a key names the input period the coefficient is paired with, so
//! the per-trip model and the annualized model can hold different coefficients
//! for the same activity (electricity is 0.45 kg/kWh per day of appliance use but
//! 0.92 kg/kWh on a monthly bill) without sharing a key.

use crate::error::FootprintError;
use footprint_schemas::{
    activity::{Appliance, CarType, FoodItem, Period, RecyclingFrequency, Textile, TransportMode},
    factor::{EmissionFactor, FactorUnit},
    file_formats::FactorFile,
};
use std::collections::HashMap;

pub const SUPPORTED_SCHEMA_VERSION: &str = "1";

/// Average distance of a short-haul flight, km.
pub const SHORT_HAUL_KM: f64 = 1100.0;
/// Average distance of a long-haul flight, km.
pub const LONG_HAUL_KM: f64 = 4400.0;

pub const PUBLIC_TRANSIT: &str = "transport.public_transit";
pub const SHORT_HAUL_FLIGHT: &str = "transport.flight.short_haul";
pub const LONG_HAUL_FLIGHT: &str = "transport.flight.long_haul";
pub const ELECTRICITY: &str = "energy.electricity";
pub const ELECTRICITY_RENEWABLE: &str = "energy.electricity.renewable";
pub const NATURAL_GAS: &str = "energy.natural_gas";
pub const MEAT: &str = "food.meat";
pub const DAIRY: &str = "food.dairy";
pub const WASTE_BASELINE: &str = "waste.baseline";

pub fn transport_key(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Walk => "transport.walk",
        TransportMode::Bicycle => "transport.bicycle",
        TransportMode::EbikeScooter => "transport.ebike_scooter",
        TransportMode::BusMetro => "transport.bus_metro",
        TransportMode::Train => "transport.train",
        TransportMode::Car => "transport.car",
        TransportMode::Motorbike => "transport.motorbike",
        TransportMode::Flight => "transport.flight",
    }
}

pub fn car_key(car_type: CarType) -> &'static str {
    match car_type {
        CarType::Electric => "transport.car.electric",
        CarType::Hybrid => "transport.car.hybrid",
        CarType::Average => "transport.car.average",
        CarType::Suv => "transport.car.suv",
    }
}

pub fn appliance_key(appliance: Appliance) -> &'static str {
    match appliance {
        Appliance::Ac => "appliance.ac",
        Appliance::Fan => "appliance.fan",
        Appliance::Refrigerator => "appliance.refrigerator",
    }
}

pub fn food_key(item: FoodItem) -> &'static str {
    match item {
        FoodItem::Beef => "food.beef",
        FoodItem::Chicken => "food.chicken",
        FoodItem::Rice => "food.rice",
        FoodItem::Wheat => "food.wheat",
    }
}

pub fn textile_key(textile: Textile) -> &'static str {
    match textile {
        Textile::Cotton => "shopping.cotton",
        Textile::Silk => "shopping.silk",
        Textile::Polyester => "shopping.polyester",
    }
}

pub fn recycling_key(frequency: RecyclingFrequency) -> &'static str {
    match frequency {
        RecyclingFrequency::Always => "waste.always",
        RecyclingFrequency::Sometimes => "waste.sometimes",
        RecyclingFrequency::Rarely => "waste.rarely",
    }
}

/// How many periods fit in a year. A trip is a one-off and is not annualized.
pub fn annual_multiplier(period: Period) -> f64 {
    match period {
        Period::Trip | Period::Year => 1.0,
        Period::Day => 365.0,
        Period::Week => 52.0,
        Period::Month => 12.0,
    }
}

/// Read-only coefficient table. Lookups of keys that were never defined yield `0.0`.
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    factors: HashMap<String, HashMap<Period, EmissionFactor>>,
}

impl FactorTable {
    /// The coefficients shipped with the crate.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for factor in builtin_factors() {
            table.insert(factor);
        }
        table
    }

    /// Layers a factor file over this table after checking its schema version.
    pub fn with_file(self, file: FactorFile) -> Result<Self, FootprintError> {
        check_schema_version(&file.schema_version)?;
        self.with_overrides(file.factors)
    }

    /// Layers `overrides` on top of this table.
    ///
    /// # Errors
    ///
    /// Fails if a factor is negative or not finite, or if it redefines an existing
    /// `(activity, period)` key with a different unit.
    pub fn with_overrides(mut self, overrides: Vec<EmissionFactor>) -> Result<Self, FootprintError> {
        for factor in overrides {
            if !factor.value.is_finite() || factor.value < 0.0 {
                return Err(FootprintError::InvalidFactor {
                    activity: factor.activity,
                    period: factor.period,
                    value: factor.value,
                });
            }
            if let Some(existing) = self.factor(&factor.activity, factor.period) {
                if existing.unit != factor.unit {
                    return Err(FootprintError::ConflictingFactor {
                        existing: existing.unit,
                        activity: factor.activity,
                        period: factor.period,
                        requested: factor.unit,
                    });
                }
            }
            self.insert(factor);
        }
        Ok(self)
    }

    fn insert(&mut self, factor: EmissionFactor) {
        self.factors
            .entry(factor.activity.clone())
            .or_default()
            .insert(factor.period, factor);
    }

    pub fn factor(&self, activity: &str, period: Period) -> Option<&EmissionFactor> {
        self.factors.get(activity).and_then(|by_period| by_period.get(&period))
    }

    pub fn get(&self, activity: &str, period: Period) -> f64 {
        self.factor(activity, period).map_or(0.0, |f| f.value)
    }

    pub fn len(&self) -> usize {
        self.factors.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All factors sorted by activity, then period.
    pub fn sorted(&self) -> Vec<&EmissionFactor> {
        let mut all: Vec<_> = self.factors.values().flat_map(HashMap::values).collect();
        all.sort_by(|a, b| a.activity.cmp(&b.activity).then(a.period.cmp(&b.period)));
        all
    }
}

pub(crate) fn check_schema_version(version: &str) -> Result<(), FootprintError> {
    if version != SUPPORTED_SCHEMA_VERSION {
        return Err(FootprintError::ConfigError(format!(
            "unsupported schema_version '{}', expected '{}'",
            version, SUPPORTED_SCHEMA_VERSION
        )));
    }
    Ok(())
}

fn factor(activity: &str, period: Period, value: f64, unit: FactorUnit) -> EmissionFactor {
    EmissionFactor {
        activity: activity.to_string(),
        period,
        value,
        unit,
        source: None,
    }
}

fn builtin_factors() -> Vec<EmissionFactor> {
    use FactorUnit::*;
    use Period::*;

    let mut factors = vec![
        // Single trip
        factor(transport_key(TransportMode::Walk), Trip, 0.0, PerKm),
        factor(transport_key(TransportMode::Bicycle), Trip, 0.0, PerKm),
        factor(transport_key(TransportMode::EbikeScooter), Trip, 0.05, PerKm),
        factor(transport_key(TransportMode::BusMetro), Trip, 0.10, PerKm),
        factor(transport_key(TransportMode::Train), Trip, 0.04, PerKm),
        factor(transport_key(TransportMode::Car), Trip, 0.21, PerKm),
        factor(transport_key(TransportMode::Motorbike), Trip, 0.09, PerKm),
        factor(transport_key(TransportMode::Flight), Trip, 0.25, PerKm),
        // Weekly commute, yearly flights
        factor(car_key(CarType::Electric), Week, 0.075, PerKm),
        factor(car_key(CarType::Hybrid), Week, 0.155, PerKm),
        factor(car_key(CarType::Average), Week, 0.251, PerKm),
        factor(car_key(CarType::Suv), Week, 0.336, PerKm),
        factor(PUBLIC_TRANSIT, Week, 0.087, PerKm),
        factor(SHORT_HAUL_FLIGHT, Year, 0.255, PerKm),
        factor(LONG_HAUL_FLIGHT, Year, 0.195, PerKm),
        // Energy
        factor(ELECTRICITY, Day, 0.45, PerKwh),
        factor(ELECTRICITY, Month, 0.92, PerKwh),
        factor(ELECTRICITY_RENEWABLE, Month, 0.1, PerKwh),
        factor(NATURAL_GAS, Month, 5.3, PerTherm),
        factor(appliance_key(Appliance::Ac), Day, 1.5, Kilowatt),
        factor(appliance_key(Appliance::Fan), Day, 0.075, Kilowatt),
        factor(appliance_key(Appliance::Refrigerator), Day, 0.05, Kilowatt),
        // Food
        factor(food_key(FoodItem::Beef), Week, 26.0, PerKg),
        factor(food_key(FoodItem::Chicken), Week, 4.4, PerKg),
        factor(food_key(FoodItem::Rice), Week, 2.5, PerKg),
        factor(food_key(FoodItem::Wheat), Week, 0.8, PerKg),
        factor(MEAT, Week, 44.07, PerKg),
        factor(DAIRY, Week, 7.5, PerKg),
        // Shopping
        factor(textile_key(Textile::Cotton), Month, 2.5, PerKg),
        factor(textile_key(Textile::Silk), Month, 15.0, PerKg),
        factor(textile_key(Textile::Polyester), Month, 7.0, PerKg),
        // Waste
        factor(WASTE_BASELINE, Year, 500.0, Kilograms),
        factor(recycling_key(RecyclingFrequency::Always), Year, 0.8, Multiplier),
        factor(recycling_key(RecyclingFrequency::Sometimes), Year, 1.0, Multiplier),
        factor(recycling_key(RecyclingFrequency::Rarely), Year, 1.2, Multiplier),
    ];
    for f in &mut factors {
        f.source = Some("builtin".to_string());
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_both_electricity_variants() {
        let table = FactorTable::builtin();
        assert_eq!(table.get(ELECTRICITY, Period::Day), 0.45);
        assert_eq!(table.get(ELECTRICITY, Period::Month), 0.92);
        assert_eq!(table.get(ELECTRICITY_RENEWABLE, Period::Month), 0.1);
    }

    #[test]
    fn missing_key_reads_as_zero() {
        let table = FactorTable::builtin();
        assert_eq!(table.get("transport.hoverboard", Period::Trip), 0.0);
        assert_eq!(table.get(transport_key(TransportMode::Car), Period::Year), 0.0);
    }

    #[test]
    fn override_with_same_unit_replaces_value() {
        let table = FactorTable::builtin()
            .with_overrides(vec![factor(ELECTRICITY, Period::Month, 0.3, FactorUnit::PerKwh)])
            .unwrap();
        assert_eq!(table.get(ELECTRICITY, Period::Month), 0.3);
        assert_eq!(table.get(ELECTRICITY, Period::Day), 0.45);
    }

    #[test]
    fn override_with_different_unit_is_rejected() {
        let err = FactorTable::builtin()
            .with_overrides(vec![factor(NATURAL_GAS, Period::Month, 0.2, FactorUnit::PerKwh)])
            .unwrap_err();
        assert!(matches!(err, FootprintError::ConflictingFactor { .. }));
    }

    #[test]
    fn negative_factor_is_rejected() {
        let err = FactorTable::default()
            .with_overrides(vec![factor("x", Period::Day, -1.0, FactorUnit::PerKg)])
            .unwrap_err();
        assert!(matches!(err, FootprintError::InvalidFactor { .. }));
    }

    #[test]
    fn unsupported_schema_version_is_a_config_error() {
        let file = FactorFile {
            schema_version: "2".to_string(),
            factors: vec![],
        };
        assert!(matches!(
            FactorTable::builtin().with_file(file),
            Err(FootprintError::ConfigError(_))
        ));
    }

    #[test]
    fn file_layers_over_builtin() {
        let file = FactorFile {
            schema_version: SUPPORTED_SCHEMA_VERSION.to_string(),
            factors: vec![factor("transport.tram", Period::Trip, 0.03, FactorUnit::PerKm)],
        };
        let table = FactorTable::builtin().with_file(file).unwrap();
        assert_eq!(table.get("transport.tram", Period::Trip), 0.03);
        assert_eq!(table.len(), FactorTable::builtin().len() + 1);
    }

    #[test]
    fn periods_of_one_activity_are_kept_apart() {
        let table = FactorTable::default()
            .with_overrides(vec![
                factor("energy.test", Period::Day, 1.0, FactorUnit::PerKwh),
                factor("energy.test", Period::Month, 2.0, FactorUnit::PerKwh),
                factor("energy.other", Period::Day, 3.0, FactorUnit::PerKwh),
            ])
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("energy.test", Period::Day), 1.0);
        assert_eq!(table.get("energy.test", Period::Month), 2.0);
        assert_eq!(table.get("energy.test", Period::Year), 0.0);

        let order: Vec<(&str, Period)> = table
            .sorted()
            .into_iter()
            .map(|f| (f.activity.as_str(), f.period))
            .collect();
        assert_eq!(
            order,
            vec![
                ("energy.other", Period::Day),
                ("energy.test", Period::Day),
                ("energy.test", Period::Month),
            ]
        );
    }

    #[test]
    fn annual_multipliers() {
        assert_eq!(annual_multiplier(Period::Day), 365.0);
        assert_eq!(annual_multiplier(Period::Week), 52.0);
        assert_eq!(annual_multiplier(Period::Month), 12.0);
        assert_eq!(annual_multiplier(Period::Trip), 1.0);
    }
}
