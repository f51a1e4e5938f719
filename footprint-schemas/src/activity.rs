use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Emission categories in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transportation,
    Energy,
    Food,
    Shopping,
    Waste,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Transportation,
        Category::Energy,
        Category::Food,
        Category::Shopping,
        Category::Waste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::Energy => "energy",
            Category::Food => "food",
            Category::Shopping => "shopping",
            Category::Waste => "waste",
        }
    }
}

/// The period an activity quantity is reported over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Trip,
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Trip => "trip",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Walk,
    Bicycle,
    EbikeScooter,
    BusMetro,
    Train,
    Car,
    Motorbike,
    Flight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarType {
    Electric,
    Hybrid,
    #[default]
    Average,
    Suv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appliance {
    Ac,
    Fan,
    Refrigerator,
}

impl Appliance {
    pub const ALL: [Appliance; 3] = [Appliance::Ac, Appliance::Fan, Appliance::Refrigerator];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodItem {
    Beef,
    Chicken,
    Rice,
    Wheat,
}

impl FoodItem {
    pub const ALL: [FoodItem; 4] = [FoodItem::Beef, FoodItem::Chicken, FoodItem::Rice, FoodItem::Wheat];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Textile {
    Cotton,
    Silk,
    Polyester,
}

impl Textile {
    pub const ALL: [Textile; 3] = [Textile::Cotton, Textile::Silk, Textile::Polyester];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclingFrequency {
    Always,
    #[default]
    Sometimes,
    Rarely,
}

/// A single logged trip compared against the mode it replaced.
///
/// A mode of `None` came from a key with no factor and contributes nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripInput {
    pub travel_mode: Option<TransportMode>,
    pub comparison_mode: Option<TransportMode>,
    pub distance_km: f64,
}

/// Weekly commuting plus yearly flight counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommuteInput {
    pub car_km_per_week: f64,
    pub car_type: Option<CarType>,
    pub transit_km_per_week: f64,
    pub short_flights_per_year: f64,
    pub long_flights_per_year: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplianceUsage {
    pub hours_per_day: BTreeMap<Appliance, f64>,
}

/// A utility meter reading over `period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub electricity_kwh: f64,
    pub natural_gas_therms: f64,
    pub period: Period,
    pub renewable: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodBasket {
    pub kg_per_week: BTreeMap<FoodItem, f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DietInput {
    pub meat_kg_per_week: f64,
    pub dairy_kg_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShoppingInput {
    pub kg_per_month: BTreeMap<Textile, f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WasteInput {
    pub recycling: Option<RecyclingFrequency>,
}

/// One category's data, tagged by the calculator model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CategoryInput {
    Trip(TripInput),
    Commute(CommuteInput),
    Appliances(ApplianceUsage),
    Metered(MeterReading),
    FoodBasket(FoodBasket),
    Diet(DietInput),
    Shopping(ShoppingInput),
    Waste(WasteInput),
}

impl CategoryInput {
    pub fn category(&self) -> Category {
        match self {
            CategoryInput::Trip(_) | CategoryInput::Commute(_) => Category::Transportation,
            CategoryInput::Appliances(_) | CategoryInput::Metered(_) => Category::Energy,
            CategoryInput::FoodBasket(_) | CategoryInput::Diet(_) => Category::Food,
            CategoryInput::Shopping(_) => Category::Shopping,
            CategoryInput::Waste(_) => Category::Waste,
        }
    }
}

/// Everything the user has entered so far, plus the categories they selected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityInput {
    pub active: BTreeSet<Category>,
    pub entries: Vec<CategoryInput>,
}

impl ActivityInput {
    pub fn is_active(&self, category: Category) -> bool {
        self.active.contains(&category)
    }

    /// Entries whose category is currently selected.
    pub fn active_entries(&self) -> impl Iterator<Item = &CategoryInput> {
        self.entries.iter().filter(|e| self.active.contains(&e.category()))
    }
}
