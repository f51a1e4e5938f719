//! Plausibility checks on entered quantities.
//!
//! Validation is independent of estimation: it reads the same [`ActivityInput`] but
//! never changes it. Issues are returned as data so the caller decides whether to
//! block, ask for confirmation, or carry on.

use crate::{
    error::FootprintError,
    factors::{annual_multiplier, check_schema_version},
    numeric::clamp_quantity,
};
use footprint_schemas::{
    activity::{ActivityInput, Appliance, CategoryInput, FoodItem, Period, Textile},
    file_formats::RangeFile,
    range::{FieldId, PlausibilityRange, Severity, ValidationIssue},
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: BTreeMap<FieldId, PlausibilityRange>,
}

impl RangeTable {
    pub fn builtin() -> Self {
        let ranges = builtin_ranges().into_iter().map(|r| (r.field, r)).collect();
        Self { ranges }
    }

    pub fn with_file(self, file: RangeFile) -> Result<Self, FootprintError> {
        check_schema_version(&file.schema_version)?;
        self.with_overrides(file.ranges)
    }

    /// Replaces or adds ranges.
    ///
    /// # Errors
    ///
    /// Fails unless `min <= warning <= max` and the average lies within `[min, max]`.
    pub fn with_overrides(mut self, overrides: Vec<PlausibilityRange>) -> Result<Self, FootprintError> {
        for range in overrides {
            check_range(&range)?;
            self.ranges.insert(range.field, range);
        }
        Ok(self)
    }

    pub fn get(&self, field: FieldId) -> Option<&PlausibilityRange> {
        self.ranges.get(&field)
    }

    /// Ranges in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PlausibilityRange> {
        self.ranges.values()
    }
}

fn check_range(range: &PlausibilityRange) -> Result<(), FootprintError> {
    let invalid = |reason: &str| FootprintError::InvalidRange {
        field: range.field,
        reason: reason.to_string(),
    };
    let values = [range.min, range.max, range.average, range.warning];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(invalid("bounds must be finite"));
    }
    if range.min > range.warning || range.warning > range.max {
        return Err(invalid("expected min <= warning <= max"));
    }
    if range.average < range.min || range.average > range.max {
        return Err(invalid("average lies outside [min, max]"));
    }
    Ok(())
}

/// Classifies every ranged field of the selected categories.
///
/// Issues come out in [`FieldId`] declaration order, at most one per field, judged
/// on the largest value any active entry carries for it: an error above `max`,
/// otherwise a warning above `warning`.
pub fn validate(input: &ActivityInput, ranges: &RangeTable) -> Vec<ValidationIssue> {
    field_values(input)
        .into_iter()
        .filter_map(|(field, reading)| ranges.get(field).and_then(|range| check_value(range, reading)))
        .collect()
}

fn check_value(range: &PlausibilityRange, reading: FieldReading) -> Option<ValidationIssue> {
    let value = reading.value;
    let entered = match reading.entered {
        Some((raw, period)) => format!(" (entered as {} per {})", raw, period.as_str()),
        None => String::new(),
    };
    if value > range.max {
        Some(ValidationIssue {
            field: range.field,
            message: format!("{} {} exceeds maximum realistic value.{}", value, range.unit, entered),
            severity: Severity::Error,
        })
    } else if value > range.warning {
        Some(ValidationIssue {
            field: range.field,
            message: format!(
                "{} {} is very high. Average is {} {}.{}",
                value, range.unit, range.average, range.unit, entered
            ),
            severity: Severity::Warning,
        })
    } else {
        None
    }
}

/// Short hint shown beside a single input, with the average given in the period the
/// value was entered over.
pub fn field_hint(field: FieldId, reading: FieldReading, ranges: &RangeTable) -> Option<String> {
    let range = ranges.get(field)?;
    if reading.value <= range.warning {
        return None;
    }
    let average = match reading.entered {
        Some((_, period)) => format!(
            "{} {}/{}",
            from_monthly(range.average, period),
            range.unit.split('/').next().unwrap_or(range.unit.as_str()),
            period.as_str()
        ),
        None => format!("{} {}", range.average, range.unit),
    };
    Some(format!("This seems unusually high (average: {})", average))
}

/// Outcome of validation plus the caller's proceed policy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(input: &ActivityInput, ranges: &RangeTable) -> Self {
        Self {
            issues: validate(input, ranges),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// A clean report always proceeds. Any issue, error or warning, needs the user
    /// to have acknowledged it.
    pub fn may_proceed(&self, acknowledged: bool) -> bool {
        self.is_clean() || acknowledged
    }
}

/// Returns a copy of `input` with `field` set to its statistical average.
///
/// Only entries that already carry the field are changed; fields with no range are
/// left as they are. Meter readings get the average converted to their own period.
pub fn use_average(input: &ActivityInput, field: FieldId, ranges: &RangeTable) -> ActivityInput {
    let mut corrected = input.clone();
    if let Some(range) = ranges.get(field) {
        for entry in &mut corrected.entries {
            let value = match reported_period(entry, field) {
                Some(period) => from_monthly(range.average, period),
                None => range.average,
            };
            set_field(entry, field, value);
        }
    }
    corrected
}

/// A ranged quantity as it is checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldReading {
    /// Value in the range's own period.
    pub value: f64,
    /// The figure as entered and its period, when the entry reported over a period
    /// other than the range's.
    pub entered: Option<(f64, Period)>,
}

/// Ranged quantities of the active entries. When several entries carry a field the
/// largest value is kept, since every entry is summed into the total.
pub fn field_values(input: &ActivityInput) -> BTreeMap<FieldId, FieldReading> {
    let mut values: BTreeMap<FieldId, FieldReading> = BTreeMap::new();
    for entry in input.active_entries() {
        for (field, raw) in entry_fields(entry) {
            let raw = clamp_quantity(raw);
            let reading = match reported_period(entry, field) {
                Some(period) => FieldReading {
                    value: to_monthly(raw, period),
                    entered: Some((raw, period)),
                },
                None => FieldReading { value: raw, entered: None },
            };
            match values.get(&field) {
                Some(current) if current.value >= reading.value => {}
                _ => {
                    values.insert(field, reading);
                }
            }
        }
    }
    values
}

/// Energy ranges are per month; a meter reading over another period is converted
/// before it is checked.
fn reported_period(entry: &CategoryInput, field: FieldId) -> Option<Period> {
    match (entry, field) {
        (CategoryInput::Metered(reading), FieldId::ElectricityKwh | FieldId::NaturalGasTherm)
            if reading.period != Period::Month =>
        {
            Some(reading.period)
        }
        _ => None,
    }
}

fn to_monthly(value: f64, period: Period) -> f64 {
    value * annual_multiplier(period) / annual_multiplier(Period::Month)
}

fn from_monthly(value: f64, period: Period) -> f64 {
    value * annual_multiplier(Period::Month) / annual_multiplier(period)
}

fn entry_fields(entry: &CategoryInput) -> Vec<(FieldId, f64)> {
    match entry {
        CategoryInput::Trip(trip) => vec![(FieldId::TripDistance, trip.distance_km)],
        CategoryInput::Commute(c) => vec![
            (FieldId::CarKm, c.car_km_per_week),
            (FieldId::PublicTransitKm, c.transit_km_per_week),
            (FieldId::ShortFlights, c.short_flights_per_year),
            (FieldId::LongFlights, c.long_flights_per_year),
        ],
        CategoryInput::Appliances(usage) => usage
            .hours_per_day
            .iter()
            .map(|(appliance, hours)| (appliance_field(*appliance), *hours))
            .collect(),
        CategoryInput::Metered(reading) => vec![
            (FieldId::ElectricityKwh, reading.electricity_kwh),
            (FieldId::NaturalGasTherm, reading.natural_gas_therms),
        ],
        CategoryInput::FoodBasket(basket) => basket
            .kg_per_week
            .iter()
            .map(|(item, kg)| (food_field(*item), *kg))
            .collect(),
        CategoryInput::Diet(diet) => vec![
            (FieldId::MeatKg, diet.meat_kg_per_week),
            (FieldId::DairyKg, diet.dairy_kg_per_week),
        ],
        CategoryInput::Shopping(shopping) => shopping
            .kg_per_month
            .iter()
            .map(|(textile, kg)| (textile_field(*textile), *kg))
            .collect(),
        CategoryInput::Waste(_) => vec![],
    }
}

/// Writes `value` into `field` if this entry carries it. Returns whether it did.
pub fn set_field(entry: &mut CategoryInput, field: FieldId, value: f64) -> bool {
    let slot: Option<&mut f64> = match entry {
        CategoryInput::Trip(trip) => match field {
            FieldId::TripDistance => Some(&mut trip.distance_km),
            _ => None,
        },
        CategoryInput::Commute(c) => match field {
            FieldId::CarKm => Some(&mut c.car_km_per_week),
            FieldId::PublicTransitKm => Some(&mut c.transit_km_per_week),
            FieldId::ShortFlights => Some(&mut c.short_flights_per_year),
            FieldId::LongFlights => Some(&mut c.long_flights_per_year),
            _ => None,
        },
        CategoryInput::Metered(reading) => match field {
            FieldId::ElectricityKwh => Some(&mut reading.electricity_kwh),
            FieldId::NaturalGasTherm => Some(&mut reading.natural_gas_therms),
            _ => None,
        },
        CategoryInput::Diet(diet) => match field {
            FieldId::MeatKg => Some(&mut diet.meat_kg_per_week),
            FieldId::DairyKg => Some(&mut diet.dairy_kg_per_week),
            _ => None,
        },
        CategoryInput::Appliances(usage) => {
            match Appliance::ALL.into_iter().find(|a| appliance_field(*a) == field) {
                Some(appliance) => usage.hours_per_day.get_mut(&appliance),
                None => None,
            }
        }
        CategoryInput::FoodBasket(basket) => {
            match FoodItem::ALL.into_iter().find(|i| food_field(*i) == field) {
                Some(item) => basket.kg_per_week.get_mut(&item),
                None => None,
            }
        }
        CategoryInput::Shopping(shopping) => {
            match Textile::ALL.into_iter().find(|t| textile_field(*t) == field) {
                Some(textile) => shopping.kg_per_month.get_mut(&textile),
                None => None,
            }
        }
        CategoryInput::Waste(_) => None,
    };
    match slot {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

pub fn appliance_field(appliance: Appliance) -> FieldId {
    match appliance {
        Appliance::Ac => FieldId::AcHours,
        Appliance::Fan => FieldId::FanHours,
        Appliance::Refrigerator => FieldId::RefrigeratorHours,
    }
}

pub fn food_field(item: FoodItem) -> FieldId {
    match item {
        FoodItem::Beef => FieldId::BeefKg,
        FoodItem::Chicken => FieldId::ChickenKg,
        FoodItem::Rice => FieldId::RiceKg,
        FoodItem::Wheat => FieldId::WheatKg,
    }
}

pub fn textile_field(textile: Textile) -> FieldId {
    match textile {
        Textile::Cotton => FieldId::CottonKg,
        Textile::Silk => FieldId::SilkKg,
        Textile::Polyester => FieldId::PolyesterKg,
    }
}

fn range(field: FieldId, min: f64, max: f64, average: f64, warning: f64, unit: &str) -> PlausibilityRange {
    PlausibilityRange {
        field,
        min,
        max,
        average,
        warning,
        unit: unit.to_string(),
    }
}

fn builtin_ranges() -> Vec<PlausibilityRange> {
    vec![
        range(FieldId::CarKm, 0.0, 1600.0, 400.0, 800.0, "km/week"),
        range(FieldId::PublicTransitKm, 0.0, 800.0, 80.0, 480.0, "km/week"),
        range(FieldId::ShortFlights, 0.0, 100.0, 4.0, 20.0, "flights/year"),
        range(FieldId::LongFlights, 0.0, 50.0, 2.0, 10.0, "flights/year"),
        range(FieldId::ElectricityKwh, 0.0, 5000.0, 877.0, 2000.0, "kWh/month"),
        range(FieldId::NaturalGasTherm, 0.0, 300.0, 40.0, 150.0, "therms/month"),
        range(FieldId::AcHours, 0.0, 24.0, 8.0, 16.0, "hours/day"),
        range(FieldId::FanHours, 0.0, 24.0, 8.0, 18.0, "hours/day"),
        range(FieldId::RefrigeratorHours, 0.0, 24.0, 24.0, 24.0, "hours/day"),
        range(FieldId::MeatKg, 0.0, 10.0, 1.5, 4.0, "kg/week"),
        range(FieldId::DairyKg, 0.0, 10.0, 2.0, 5.0, "kg/week"),
        range(FieldId::CottonKg, 0.0, 20.0, 1.0, 5.0, "kg/month"),
        range(FieldId::SilkKg, 0.0, 5.0, 0.1, 1.0, "kg/month"),
        range(FieldId::PolyesterKg, 0.0, 25.0, 1.5, 6.0, "kg/month"),
    ]
}
