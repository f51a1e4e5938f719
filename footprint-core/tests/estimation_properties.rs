use footprint_core::{
    estimate::{compute, Estimator},
    factors::FactorTable,
    form::parse_form,
    validation::{validate, RangeTable, ValidationReport},
};
use footprint_schemas::{
    activity::{
        ActivityInput, CarType, Category, CategoryInput, CommuteInput, DietInput, FoodBasket,
        FoodItem, MeterReading, Period, RecyclingFrequency, ShoppingInput, Textile, TransportMode,
        TripInput, WasteInput,
    },
    form::FormInput,
    range::{FieldId, Severity},
    result::MassUnit,
};

fn all_categories(entries: Vec<CategoryInput>) -> ActivityInput {
    ActivityInput {
        active: Category::ALL.into_iter().collect(),
        entries,
    }
}

fn annual_household(car_km: f64, kwh: f64, meat_kg: f64, cotton_kg: f64) -> ActivityInput {
    all_categories(vec![
        CategoryInput::Commute(CommuteInput {
            car_km_per_week: car_km,
            car_type: Some(CarType::Average),
            transit_km_per_week: 80.0,
            short_flights_per_year: 4.0,
            long_flights_per_year: 2.0,
        }),
        CategoryInput::Metered(MeterReading {
            electricity_kwh: kwh,
            natural_gas_therms: 40.0,
            period: Period::Month,
            renewable: false,
        }),
        CategoryInput::Diet(DietInput {
            meat_kg_per_week: meat_kg,
            dairy_kg_per_week: 2.0,
        }),
        CategoryInput::Shopping(ShoppingInput {
            kg_per_month: [(Textile::Cotton, cotton_kg), (Textile::Polyester, 1.5)]
                .into_iter()
                .collect(),
        }),
        CategoryInput::Waste(WasteInput {
            recycling: Some(RecyclingFrequency::Sometimes),
        }),
    ])
}

fn commute_only(car_km: f64) -> ActivityInput {
    ActivityInput {
        active: [Category::Transportation].into_iter().collect(),
        entries: vec![CategoryInput::Commute(CommuteInput {
            car_km_per_week: car_km,
            car_type: Some(CarType::Average),
            ..CommuteInput::default()
        })],
    }
}

#[test]
fn bicycle_trip_instead_of_car() {
    let table = FactorTable::builtin();
    let input = ActivityInput {
        active: [Category::Transportation].into_iter().collect(),
        entries: vec![CategoryInput::Trip(TripInput {
            travel_mode: Some(TransportMode::Bicycle),
            comparison_mode: Some(TransportMode::Car),
            distance_km: 50.0,
        })],
    };

    let result = compute(&input, &table);
    assert_eq!(result.total, 0.0);
    assert_eq!(result.headline_total, 0);
    assert_eq!(result.secondary.trip_savings, Some(10.5));
}

#[test]
fn weekly_car_kilometres_annualize() {
    let table = FactorTable::builtin();
    let result = Estimator::new(&table)
        .with_unit(MassUnit::Tonnes)
        .compute(&commute_only(400.0));

    // 400 km/week * 52 * 0.251 kg/km = 5220.8 kg
    assert_eq!(result.breakdown[&Category::Transportation], 5.22);
    assert_eq!(result.total, 5.22);
    assert_eq!(result.headline_total, 5);

    let in_kg = compute(&commute_only(400.0), &table);
    assert_eq!(in_kg.total, 5220.8);
    assert_eq!(in_kg.headline_total, 5221);
}

#[test]
fn weekly_meat_annualizes() {
    let table = FactorTable::builtin();
    let input = ActivityInput {
        active: [Category::Food].into_iter().collect(),
        entries: vec![CategoryInput::Diet(DietInput {
            meat_kg_per_week: 1.5,
            dairy_kg_per_week: 0.0,
        })],
    };
    let result = Estimator::new(&table).with_unit(MassUnit::Tonnes).compute(&input);
    assert_eq!(result.breakdown[&Category::Food], 3.44);
}

#[test]
fn car_km_above_warning_threshold_warns_without_blocking() {
    let report = ValidationReport::new(&commute_only(1000.0), &RangeTable::builtin());
    assert_eq!(report.warnings().count(), 1);
    assert_eq!(report.errors().count(), 0);
    assert!(!report.has_errors());
    assert!(report.may_proceed(true));
}

#[test]
fn car_km_above_maximum_is_an_error() {
    let report = ValidationReport::new(&commute_only(2000.0), &RangeTable::builtin());
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].field, FieldId::CarKm);
    assert_eq!(report.issues[0].severity, Severity::Error);
    assert!(report.has_errors());
    assert!(!report.may_proceed(false));
}

#[test]
fn compute_is_deterministic() {
    let table = FactorTable::builtin();
    let input = annual_household(250.0, 600.0, 1.0, 2.0);
    assert_eq!(compute(&input, &table), compute(&input, &table));
}

#[test]
fn validate_has_no_hidden_state() {
    let ranges = RangeTable::builtin();
    let input = annual_household(1200.0, 6000.0, 5.0, 30.0);
    let first = validate(&input, &ranges);
    let second = validate(&input, &ranges);
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn deselected_categories_contribute_nothing() {
    let table = FactorTable::builtin();
    let full = annual_household(250.0, 600.0, 1.0, 2.0);
    let full_result = compute(&full, &table);

    for category in Category::ALL {
        let mut partial = full.clone();
        partial.active.remove(&category);
        let result = compute(&partial, &table);

        assert!(!result.breakdown.contains_key(&category));
        let expected: f64 = full_result
            .breakdown
            .iter()
            .filter(|(c, _)| **c != category)
            .map(|(_, v)| v)
            .sum();
        assert!((result.total - expected).abs() < 0.02, "{:?}", category);
    }
}

#[test]
fn raising_one_quantity_never_lowers_its_category() {
    let table = FactorTable::builtin();
    let estimator = Estimator::new(&table);
    let mut previous = [0.0f64; 4];

    for step in 0..20 {
        let q = step as f64 * 7.5;
        let samples = [
            (annual_household(q, 0.0, 0.0, 0.0), Category::Transportation),
            (annual_household(0.0, q, 0.0, 0.0), Category::Energy),
            (annual_household(0.0, 0.0, q, 0.0), Category::Food),
            (annual_household(0.0, 0.0, 0.0, q), Category::Shopping),
        ];
        for (i, (input, category)) in samples.iter().enumerate() {
            let value = estimator.compute(input).breakdown[category];
            assert!(value >= previous[i], "{:?} dropped at {}", category, q);
            previous[i] = value;
        }
    }
}

#[test]
fn food_basket_live_total_is_separate_from_annual() {
    let table = FactorTable::builtin();
    let input = ActivityInput {
        active: [Category::Food].into_iter().collect(),
        entries: vec![CategoryInput::FoodBasket(FoodBasket {
            kg_per_week: [(FoodItem::Beef, 1.0)].into_iter().collect(),
        })],
    };
    let result = compute(&input, &table);
    assert_eq!(result.secondary.weekly_food, Some(26.0));
    assert_eq!(result.total, 1352.0);
}

#[test]
fn yaml_form_flows_through_validation_and_estimation() {
    let yaml = r#"
active: [transportation, food, waste]
sections:
  transportation:
    carKm: "1,000"
    carType: suv
  diet:
    meatKg: "1.5"
    dairyKg: "2"
  waste:
    recycling: always
  shopping:
    cottonKg: "3"
"#;
    let form: FormInput = serde_yaml::from_str(yaml).unwrap();
    let parsed = parse_form(&form);
    assert!(parsed.unknown.is_empty());

    let issues = validate(&parsed.input, &RangeTable::builtin());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);

    let result = compute(&parsed.input, &FactorTable::builtin());
    assert_eq!(result.breakdown.len(), 3);
    assert!(!result.breakdown.contains_key(&Category::Shopping));
    assert_eq!(result.breakdown[&Category::Waste], 400.0);
    assert_eq!(result.breakdown[&Category::Transportation], 17472.0);
}

#[test]
fn result_serializes_with_snake_case_categories() {
    let result = compute(&commute_only(100.0), &FactorTable::builtin());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["unit"], "kilograms");
    assert!(json["breakdown"]["transportation"].is_number());
}
