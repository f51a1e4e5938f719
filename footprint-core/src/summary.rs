use crate::numeric::round2;
use footprint_schemas::{activity::Category, result::CalculationResult};

/// Typical annual footprint the savings figure is measured against, kg CO2e.
pub const AVERAGE_ANNUAL_FOOTPRINT_KG: f64 = 16_000.0;

/// Derived figures handed to the stats collaborator alongside an annual result.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintSummary {
    /// Largest category; ties go to the earlier category.
    pub dominant_category: Option<Category>,
    pub saved_kg_per_year: f64,
    pub saved_kg_per_week: f64,
}

pub fn summarize(result: &CalculationResult, average_kg: f64) -> FootprintSummary {
    let mut dominant: Option<(Category, f64)> = None;
    for (category, value) in &result.breakdown {
        if dominant.map_or(true, |(_, max)| *value > max) {
            dominant = Some((*category, *value));
        }
    }

    let saved = (average_kg - result.total_kg).max(0.0);

    FootprintSummary {
        dominant_category: dominant.map(|(category, _)| category),
        saved_kg_per_year: round2(saved),
        saved_kg_per_week: round2(saved / 52.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_schemas::result::{MassUnit, SecondaryMetrics};

    fn result(unit: MassUnit, breakdown: &[(Category, f64)]) -> CalculationResult {
        let total = breakdown.iter().map(|(_, v)| v).sum::<f64>();
        CalculationResult {
            unit,
            total,
            headline_total: total.round() as i64,
            total_kg: unit.to_kg(total),
            breakdown: breakdown.iter().copied().collect(),
            secondary: SecondaryMetrics::default(),
        }
    }

    #[test]
    fn dominant_category_prefers_earlier_on_ties() {
        let r = result(
            MassUnit::Kilograms,
            &[(Category::Transportation, 100.0), (Category::Energy, 300.0), (Category::Food, 300.0)],
        );
        assert_eq!(summarize(&r, AVERAGE_ANNUAL_FOOTPRINT_KG).dominant_category, Some(Category::Energy));
    }

    #[test]
    fn shopping_can_dominate() {
        let r = result(MassUnit::Kilograms, &[(Category::Food, 10.0), (Category::Shopping, 20.0)]);
        assert_eq!(summarize(&r, AVERAGE_ANNUAL_FOOTPRINT_KG).dominant_category, Some(Category::Shopping));
    }

    #[test]
    fn savings_compare_in_kilograms() {
        let r = result(MassUnit::Tonnes, &[(Category::Food, 10.8)]);
        let summary = summarize(&r, AVERAGE_ANNUAL_FOOTPRINT_KG);
        assert_eq!(summary.saved_kg_per_year, 5200.0);
        assert_eq!(summary.saved_kg_per_week, 100.0);
    }

    #[test]
    fn savings_use_the_unrounded_kilogram_total() {
        let mut r = result(MassUnit::Tonnes, &[(Category::Food, 10.8)]);
        r.total_kg = 10_804.0;
        let summary = summarize(&r, AVERAGE_ANNUAL_FOOTPRINT_KG);
        assert_eq!(summary.saved_kg_per_year, 5196.0);
        assert_eq!(summary.saved_kg_per_week, 99.92);
    }

    #[test]
    fn savings_never_go_negative() {
        let r = result(MassUnit::Kilograms, &[(Category::Transportation, 20_000.0)]);
        let summary = summarize(&r, AVERAGE_ANNUAL_FOOTPRINT_KG);
        assert_eq!(summary.saved_kg_per_year, 0.0);
        assert_eq!(summary.saved_kg_per_week, 0.0);
    }

    #[test]
    fn empty_breakdown_has_no_dominant_category() {
        let r = result(MassUnit::Kilograms, &[]);
        assert_eq!(summarize(&r, AVERAGE_ANNUAL_FOOTPRINT_KG).dominant_category, None);
    }
}
