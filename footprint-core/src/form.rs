//! Conversion of raw form text into a typed [`ActivityInput`].
//!
//! Nothing here fails. Quantities are coerced with [`parse_amount`]; keys that name
//! no known category, field, or mode are dropped from the input and reported in
//! [`ParsedForm::unknown`] so the caller can log them as configuration defects.

use crate::numeric::parse_amount;
use footprint_schemas::{
    activity::{
        ActivityInput, Appliance, ApplianceUsage, CarType, Category, CategoryInput, CommuteInput,
        DietInput, FoodBasket, FoodItem, MeterReading, Period, RecyclingFrequency, ShoppingInput,
        Textile, TransportMode, TripInput, WasteInput,
    },
    form::FormInput,
};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownKey {
    Category(String),
    Section(String),
    Field { section: String, field: String },
    Value { section: String, field: String, value: String },
}

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownKey::Category(name) => write!(f, "unknown category '{}'", name),
            UnknownKey::Section(name) => write!(f, "unknown form section '{}'", name),
            UnknownKey::Field { section, field } => {
                write!(f, "unknown field '{}' in section '{}'", field, section)
            }
            UnknownKey::Value { section, field, value } => {
                write!(f, "unknown value '{}' for '{}.{}'", value, section, field)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedForm {
    pub input: ActivityInput,
    pub unknown: Vec<UnknownKey>,
}

type Fields = BTreeMap<String, String>;

/// Builds typed input from every section of the form, in section-name order.
pub fn parse_form(form: &FormInput) -> ParsedForm {
    let mut parsed = ParsedForm::default();

    for name in &form.active {
        match parse_category(name) {
            Some(category) => {
                parsed.input.active.insert(category);
            }
            None => parsed.unknown.push(UnknownKey::Category(name.clone())),
        }
    }

    for (section, fields) in &form.sections {
        let mut cx = SectionParser {
            section,
            fields,
            unknown: &mut parsed.unknown,
        };
        let entry = match section.as_str() {
            "trip" => cx.trip(),
            "transportation" => cx.commute(),
            "homeAppliances" => cx.appliances(),
            "energy" => cx.metered(),
            "food" | "ateSustainably" => cx.food_basket(),
            "diet" => cx.diet(),
            "shopping" => cx.shopping(),
            "waste" => cx.waste(),
            _ => {
                parsed.unknown.push(UnknownKey::Section(section.clone()));
                continue;
            }
        };
        parsed.input.entries.push(entry);
    }

    parsed
}

pub fn parse_category(name: &str) -> Option<Category> {
    match normalize(name).as_str() {
        "transportation" | "transport" | "trip" => Some(Category::Transportation),
        "energy" | "homeenergy" | "homeappliances" => Some(Category::Energy),
        "food" | "diet" | "atesustainably" => Some(Category::Food),
        "shopping" => Some(Category::Shopping),
        "waste" => Some(Category::Waste),
        _ => None,
    }
}

pub fn parse_transport_mode(text: &str) -> Option<TransportMode> {
    match normalize(text).as_str() {
        "walk" => Some(TransportMode::Walk),
        "bicycle" | "bike" => Some(TransportMode::Bicycle),
        "ebikescooter" | "ebike" | "scooter" => Some(TransportMode::EbikeScooter),
        "busmetro" | "bus" | "metro" => Some(TransportMode::BusMetro),
        "train" => Some(TransportMode::Train),
        "car" => Some(TransportMode::Car),
        "motorbike" => Some(TransportMode::Motorbike),
        "flight" => Some(TransportMode::Flight),
        _ => None,
    }
}

pub fn parse_car_type(text: &str) -> Option<CarType> {
    match normalize(text).as_str() {
        "electric" => Some(CarType::Electric),
        "hybrid" => Some(CarType::Hybrid),
        "average" => Some(CarType::Average),
        "suv" => Some(CarType::Suv),
        _ => None,
    }
}

pub fn parse_recycling(text: &str) -> Option<RecyclingFrequency> {
    match normalize(text).as_str() {
        "always" => Some(RecyclingFrequency::Always),
        "sometimes" => Some(RecyclingFrequency::Sometimes),
        "rarely" => Some(RecyclingFrequency::Rarely),
        _ => None,
    }
}

pub fn parse_period(text: &str) -> Option<Period> {
    match normalize(text).as_str() {
        "trip" => Some(Period::Trip),
        "day" | "daily" => Some(Period::Day),
        "week" | "weekly" => Some(Period::Week),
        "month" | "monthly" => Some(Period::Month),
        "year" | "yearly" | "annual" => Some(Period::Year),
        _ => None,
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match normalize(text).as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

struct SectionParser<'a> {
    section: &'a str,
    fields: &'a Fields,
    unknown: &'a mut Vec<UnknownKey>,
}

impl SectionParser<'_> {
    fn amount(&self, field: &str) -> f64 {
        self.fields.get(field).map_or(0.0, |v| parse_amount(v))
    }

    fn flag_unknown_fields(&mut self, known: &[&str]) {
        for field in self.fields.keys() {
            if !known.contains(&field.as_str()) {
                self.unknown.push(UnknownKey::Field {
                    section: self.section.to_string(),
                    field: field.clone(),
                });
            }
        }
    }

    /// Parses an enumerated field. A missing field yields `default`; an unrecognised
    /// one yields `None` and is reported.
    fn choice<T>(&mut self, field: &str, default: Option<T>, parse: fn(&str) -> Option<T>) -> Option<T> {
        let Some(text) = self.fields.get(field) else {
            return default;
        };
        let parsed = parse(text);
        if parsed.is_none() {
            self.unknown.push(UnknownKey::Value {
                section: self.section.to_string(),
                field: field.to_string(),
                value: text.clone(),
            });
        }
        parsed
    }

    fn trip(&mut self) -> CategoryInput {
        self.flag_unknown_fields(&["travelMode", "comparisonMode", "distance"]);
        let travel_mode = self.choice("travelMode", None, parse_transport_mode);
        let comparison_mode = self.choice("comparisonMode", None, parse_transport_mode);
        CategoryInput::Trip(TripInput {
            travel_mode,
            comparison_mode,
            distance_km: self.amount("distance"),
        })
    }

    fn commute(&mut self) -> CategoryInput {
        self.flag_unknown_fields(&["carKm", "carType", "publicTransitKm", "shortFlights", "longFlights"]);
        let car_type = self.choice("carType", Some(CarType::default()), parse_car_type);
        CategoryInput::Commute(CommuteInput {
            car_km_per_week: self.amount("carKm"),
            car_type,
            transit_km_per_week: self.amount("publicTransitKm"),
            short_flights_per_year: self.amount("shortFlights"),
            long_flights_per_year: self.amount("longFlights"),
        })
    }

    fn appliances(&mut self) -> CategoryInput {
        let mut usage = ApplianceUsage::default();
        for (field, text) in self.fields {
            match Appliance::ALL.iter().find(|a| appliance_form_key(**a) == field.as_str()) {
                Some(appliance) => {
                    usage.hours_per_day.insert(*appliance, parse_amount(text));
                }
                None => self.unknown.push(UnknownKey::Field {
                    section: self.section.to_string(),
                    field: field.clone(),
                }),
            }
        }
        CategoryInput::Appliances(usage)
    }

    fn metered(&mut self) -> CategoryInput {
        self.flag_unknown_fields(&["electricityKwh", "naturalGasTherm", "renewableEnergy", "period"]);
        let renewable = self.choice("renewableEnergy", Some(false), parse_flag).unwrap_or(false);
        let period = self.choice("period", Some(Period::Month), parse_period).unwrap_or(Period::Month);
        CategoryInput::Metered(MeterReading {
            electricity_kwh: self.amount("electricityKwh"),
            natural_gas_therms: self.amount("naturalGasTherm"),
            period,
            renewable,
        })
    }

    fn food_basket(&mut self) -> CategoryInput {
        let mut basket = FoodBasket::default();
        for (field, text) in self.fields {
            match FoodItem::ALL.iter().find(|i| food_form_key(**i) == field.as_str()) {
                Some(item) => {
                    basket.kg_per_week.insert(*item, parse_amount(text));
                }
                None => self.unknown.push(UnknownKey::Field {
                    section: self.section.to_string(),
                    field: field.clone(),
                }),
            }
        }
        CategoryInput::FoodBasket(basket)
    }

    fn diet(&mut self) -> CategoryInput {
        self.flag_unknown_fields(&["meatKg", "dairyKg"]);
        CategoryInput::Diet(DietInput {
            meat_kg_per_week: self.amount("meatKg"),
            dairy_kg_per_week: self.amount("dairyKg"),
        })
    }

    fn shopping(&mut self) -> CategoryInput {
        let mut shopping = ShoppingInput::default();
        for (field, text) in self.fields {
            match Textile::ALL.iter().find(|t| textile_form_key(**t) == field.as_str()) {
                Some(textile) => {
                    shopping.kg_per_month.insert(*textile, parse_amount(text));
                }
                None => self.unknown.push(UnknownKey::Field {
                    section: self.section.to_string(),
                    field: field.clone(),
                }),
            }
        }
        CategoryInput::Shopping(shopping)
    }

    fn waste(&mut self) -> CategoryInput {
        self.flag_unknown_fields(&["recycling"]);
        let recycling = self.choice("recycling", Some(RecyclingFrequency::default()), parse_recycling);
        CategoryInput::Waste(WasteInput { recycling })
    }
}

fn appliance_form_key(appliance: Appliance) -> &'static str {
    match appliance {
        Appliance::Ac => "ac",
        Appliance::Fan => "fan",
        Appliance::Refrigerator => "refrigerator",
    }
}

fn food_form_key(item: FoodItem) -> &'static str {
    match item {
        FoodItem::Beef => "beef",
        FoodItem::Chicken => "chicken",
        FoodItem::Rice => "rice",
        FoodItem::Wheat => "wheat",
    }
}

fn textile_form_key(textile: Textile) -> &'static str {
    match textile {
        Textile::Cotton => "cottonKg",
        Textile::Silk => "silkKg",
        Textile::Polyester => "polyesterKg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(active: &[&str], sections: &[(&str, &[(&str, &str)])]) -> FormInput {
        FormInput {
            active: active.iter().map(|s| s.to_string()).collect(),
            sections: sections
                .iter()
                .map(|(name, fields)| {
                    (
                        name.to_string(),
                        fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn trip_section_parses_modes_and_distance() {
        let parsed = parse_form(&form(
            &["transportation"],
            &[("trip", &[("travelMode", "bicycle"), ("comparisonMode", "car"), ("distance", "50")])],
        ));
        assert!(parsed.unknown.is_empty());
        assert_eq!(
            parsed.input.entries,
            vec![CategoryInput::Trip(TripInput {
                travel_mode: Some(TransportMode::Bicycle),
                comparison_mode: Some(TransportMode::Car),
                distance_km: 50.0,
            })]
        );
    }

    #[test]
    fn camel_case_mode_keys_are_accepted() {
        assert_eq!(parse_transport_mode("eBikeScooter"), Some(TransportMode::EbikeScooter));
        assert_eq!(parse_transport_mode("busMetro"), Some(TransportMode::BusMetro));
        assert_eq!(parse_transport_mode("bus_metro"), Some(TransportMode::BusMetro));
    }

    #[test]
    fn unknown_mode_is_kept_as_none_and_reported() {
        let parsed = parse_form(&form(
            &["transportation"],
            &[("trip", &[("travelMode", "teleport"), ("distance", "12")])],
        ));
        assert_eq!(
            parsed.unknown,
            vec![UnknownKey::Value {
                section: "trip".to_string(),
                field: "travelMode".to_string(),
                value: "teleport".to_string(),
            }]
        );
        match &parsed.input.entries[0] {
            CategoryInput::Trip(trip) => assert_eq!(trip.travel_mode, None),
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn commute_defaults_to_average_car() {
        let parsed = parse_form(&form(&["transportation"], &[("transportation", &[("carKm", "400")])]));
        match &parsed.input.entries[0] {
            CategoryInput::Commute(c) => {
                assert_eq!(c.car_type, Some(CarType::Average));
                assert_eq!(c.car_km_per_week, 400.0);
                assert_eq!(c.transit_km_per_week, 0.0);
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn unknown_sections_fields_and_categories_are_reported() {
        let parsed = parse_form(&form(
            &["food", "pets"],
            &[
                ("food", &[("beef", "1"), ("tofu", "2")]),
                ("garden", &[("area", "3")]),
            ],
        ));
        assert_eq!(parsed.input.active.len(), 1);
        assert_eq!(parsed.input.entries.len(), 1);
        assert_eq!(
            parsed.unknown,
            vec![
                UnknownKey::Category("pets".to_string()),
                UnknownKey::Field {
                    section: "food".to_string(),
                    field: "tofu".to_string(),
                },
                UnknownKey::Section("garden".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_numbers_become_zero_or_their_digits() {
        let parsed = parse_form(&form(
            &["food"],
            &[("diet", &[("meatKg", "abc"), ("dairyKg", "2.505kg")])],
        ));
        match &parsed.input.entries[0] {
            CategoryInput::Diet(d) => {
                assert_eq!(d.meat_kg_per_week, 0.0);
                assert_eq!(d.dairy_kg_per_week, 2.5);
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn energy_section_reads_flag_and_period() {
        let parsed = parse_form(&form(
            &["energy"],
            &[("energy", &[("electricityKwh", "300"), ("renewableEnergy", "yes"), ("period", "monthly")])],
        ));
        match &parsed.input.entries[0] {
            CategoryInput::Metered(r) => {
                assert!(r.renewable);
                assert_eq!(r.period, Period::Month);
                assert_eq!(r.electricity_kwh, 300.0);
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn unknown_recycling_value_contributes_nothing() {
        let parsed = parse_form(&form(&["waste"], &[("waste", &[("recycling", "never")])]));
        assert_eq!(
            parsed.input.entries,
            vec![CategoryInput::Waste(WasteInput { recycling: None })]
        );
        assert_eq!(parsed.unknown.len(), 1);
    }
}
