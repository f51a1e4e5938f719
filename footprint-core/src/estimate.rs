use crate::{
    factors::{self, annual_multiplier, FactorTable},
    numeric::{clamp_quantity, round2},
};
use footprint_schemas::{
    activity::{
        ActivityInput, ApplianceUsage, Category, CategoryInput, CommuteInput, DietInput,
        FoodBasket, MeterReading, Period, ShoppingInput, TransportMode, TripInput, WasteInput,
    },
    result::{CalculationResult, MassUnit, SecondaryMetrics},
};
use std::collections::BTreeMap;

/// Turns activity data into emission figures. All arithmetic is done in kilograms
/// of CO2e and converted to `unit` only when the result is assembled.
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    factors: &'a FactorTable,
    unit: MassUnit,
}

impl<'a> Estimator<'a> {
    pub fn new(factors: &'a FactorTable) -> Self {
        Self {
            factors,
            unit: MassUnit::Kilograms,
        }
    }

    pub fn with_unit(mut self, unit: MassUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn compute(&self, input: &ActivityInput) -> CalculationResult {
        let mut totals_kg: BTreeMap<Category, f64> =
            input.active.iter().map(|c| (*c, 0.0)).collect();
        let mut secondary_kg = SecondaryKg::default();

        for entry in input.active_entries() {
            *totals_kg.entry(entry.category()).or_insert(0.0) += self.entry_kg(entry);

            match entry {
                CategoryInput::Trip(trip) => secondary_kg.trip_savings.push(self.trip_savings_kg(trip)),
                CategoryInput::Appliances(usage) => {
                    secondary_kg.daily_appliance.push(self.daily_appliance_kg(usage))
                }
                CategoryInput::FoodBasket(basket) => {
                    secondary_kg.weekly_food.push(self.weekly_food_kg(basket))
                }
                _ => {}
            }
        }

        let total_kg: f64 = totals_kg.values().sum();
        let total_in_unit = self.unit.from_kg(total_kg);
        let breakdown = totals_kg
            .into_iter()
            .map(|(category, kg)| (category, round2(self.unit.from_kg(kg))))
            .collect();

        CalculationResult {
            unit: self.unit,
            total: round2(total_in_unit),
            headline_total: total_in_unit.round() as i64,
            total_kg,
            breakdown,
            secondary: SecondaryMetrics {
                trip_savings: self.sum_in_unit(&secondary_kg.trip_savings),
                daily_appliance: self.sum_in_unit(&secondary_kg.daily_appliance),
                weekly_food: self.sum_in_unit(&secondary_kg.weekly_food),
            },
        }
    }

    /// Emissions of one entry in kilograms, annualized where the model is annual.
    pub fn entry_kg(&self, entry: &CategoryInput) -> f64 {
        match entry {
            CategoryInput::Trip(trip) => self.trip_kg(trip),
            CategoryInput::Commute(commute) => self.commute_kg(commute),
            CategoryInput::Appliances(usage) => self.daily_appliance_kg(usage) * annual_multiplier(Period::Day),
            CategoryInput::Metered(reading) => self.metered_kg(reading),
            CategoryInput::FoodBasket(basket) => self.weekly_food_kg(basket) * annual_multiplier(Period::Week),
            CategoryInput::Diet(diet) => self.diet_kg(diet),
            CategoryInput::Shopping(shopping) => self.shopping_kg(shopping),
            CategoryInput::Waste(waste) => self.waste_kg(waste),
        }
    }

    fn trip_factor(&self, mode: Option<TransportMode>) -> Option<f64> {
        mode.and_then(|m| self.factors.factor(factors::transport_key(m), Period::Trip))
            .map(|f| f.value)
    }

    pub fn trip_kg(&self, trip: &TripInput) -> f64 {
        clamp_quantity(trip.distance_km) * self.trip_factor(trip.travel_mode).unwrap_or(0.0)
    }

    /// Emissions avoided by travelling as logged instead of by the comparison mode.
    ///
    /// Negative when the chosen mode emits more than the comparison. Zero if either
    /// mode has no factor.
    pub fn trip_savings_kg(&self, trip: &TripInput) -> f64 {
        match (self.trip_factor(trip.travel_mode), self.trip_factor(trip.comparison_mode)) {
            (Some(travel), Some(comparison)) => clamp_quantity(trip.distance_km) * (comparison - travel),
            _ => 0.0,
        }
    }

    pub fn commute_kg(&self, commute: &CommuteInput) -> f64 {
        let weeks = annual_multiplier(Period::Week);
        let car_factor = commute
            .car_type
            .map_or(0.0, |t| self.factors.get(factors::car_key(t), Period::Week));

        let car = clamp_quantity(commute.car_km_per_week) * weeks * car_factor;
        let transit = clamp_quantity(commute.transit_km_per_week)
            * weeks
            * self.factors.get(factors::PUBLIC_TRANSIT, Period::Week);
        let short_flights = clamp_quantity(commute.short_flights_per_year)
            * factors::SHORT_HAUL_KM
            * self.factors.get(factors::SHORT_HAUL_FLIGHT, Period::Year);
        let long_flights = clamp_quantity(commute.long_flights_per_year)
            * factors::LONG_HAUL_KM
            * self.factors.get(factors::LONG_HAUL_FLIGHT, Period::Year);

        car + transit + short_flights + long_flights
    }

    /// Meter readings always use the monthly-bill coefficients, scaled to a year by the
    /// reading's own period.
    pub fn metered_kg(&self, reading: &MeterReading) -> f64 {
        let periods = annual_multiplier(reading.period);
        let electricity_factor = if reading.renewable {
            self.factors.get(factors::ELECTRICITY_RENEWABLE, Period::Month)
        } else {
            self.factors.get(factors::ELECTRICITY, Period::Month)
        };
        clamp_quantity(reading.electricity_kwh) * periods * electricity_factor
            + clamp_quantity(reading.natural_gas_therms)
                * periods
                * self.factors.get(factors::NATURAL_GAS, Period::Month)
    }

    /// Today's appliance emissions, shown live while the user edits hours of use.
    pub fn daily_appliance_kg(&self, usage: &ApplianceUsage) -> f64 {
        let electricity_factor = self.factors.get(factors::ELECTRICITY, Period::Day);
        usage
            .hours_per_day
            .iter()
            .map(|(appliance, hours)| {
                let power_kw = self.factors.get(factors::appliance_key(*appliance), Period::Day);
                power_kw * clamp_quantity(*hours) * electricity_factor
            })
            .sum()
    }

    /// This week's food emissions, shown live while the user edits quantities.
    pub fn weekly_food_kg(&self, basket: &FoodBasket) -> f64 {
        basket
            .kg_per_week
            .iter()
            .map(|(item, kg)| clamp_quantity(*kg) * self.factors.get(factors::food_key(*item), Period::Week))
            .sum()
    }

    pub fn diet_kg(&self, diet: &DietInput) -> f64 {
        let weeks = annual_multiplier(Period::Week);
        clamp_quantity(diet.meat_kg_per_week) * weeks * self.factors.get(factors::MEAT, Period::Week)
            + clamp_quantity(diet.dairy_kg_per_week) * weeks * self.factors.get(factors::DAIRY, Period::Week)
    }

    pub fn shopping_kg(&self, shopping: &ShoppingInput) -> f64 {
        let months = annual_multiplier(Period::Month);
        shopping
            .kg_per_month
            .iter()
            .map(|(textile, kg)| {
                clamp_quantity(*kg) * months * self.factors.get(factors::textile_key(*textile), Period::Month)
            })
            .sum()
    }

    pub fn waste_kg(&self, waste: &WasteInput) -> f64 {
        let multiplier = waste
            .recycling
            .map_or(0.0, |r| self.factors.get(factors::recycling_key(r), Period::Year));
        self.factors.get(factors::WASTE_BASELINE, Period::Year) * multiplier
    }

    fn sum_in_unit(&self, values_kg: &[f64]) -> Option<f64> {
        if values_kg.is_empty() {
            None
        } else {
            Some(round2(self.unit.from_kg(values_kg.iter().sum())))
        }
    }
}

#[derive(Default)]
struct SecondaryKg {
    trip_savings: Vec<f64>,
    daily_appliance: Vec<f64>,
    weekly_food: Vec<f64>,
}

/// Computes with the given table, reporting in kilograms.
pub fn compute(input: &ActivityInput, factors: &FactorTable) -> CalculationResult {
    Estimator::new(factors).compute(input)
}
