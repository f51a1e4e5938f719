use crate::{config::FootprintConfig, plotting, store::CalculationStore};
use anyhow::Result;
use footprint_core::{
    estimate::Estimator,
    factors::FactorTable,
    form::parse_form,
    summary::{summarize, FootprintSummary, AVERAGE_ANNUAL_FOOTPRINT_KG},
    validation::{field_hint, field_values, use_average, RangeTable, ValidationReport},
};
use footprint_schemas::{
    activity::ActivityInput,
    form::FormInput,
    range::{FieldId, Severity},
    result::{CalculationRecord, CalculationResult, MassUnit},
};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Per-run choices taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    pub unit: MassUnit,
    /// The user has seen the validation issues and wants to continue anyway.
    pub acknowledge: bool,
    pub use_average: Vec<FieldId>,
    pub user_id: Option<String>,
    pub chart: Option<PathBuf>,
}

#[derive(Debug)]
pub enum EstimateOutcome {
    /// Validation raised issues the user has not acknowledged. Nothing was computed.
    Blocked(ValidationReport),
    Completed {
        result: CalculationResult,
        summary: FootprintSummary,
    },
}

/// Parses the form, logs keys it did not recognize, and applies any requested
/// "use average" corrections.
pub fn prepare_input(form: &FormInput, config: &FootprintConfig, use_average_fields: &[FieldId]) -> ActivityInput {
    let parsed = parse_form(form);
    for key in &parsed.unknown {
        warn!(key = %key, "unrecognized form key contributes nothing");
    }

    let mut input = parsed.input;
    for field in use_average_fields {
        match config.ranges.get(*field) {
            Some(range) => info!(field = %field, average = range.average, "replacing value with average"),
            None => warn!(field = %field, "no range for field, cannot apply average"),
        }
        input = use_average(&input, *field, &config.ranges);
    }
    input
}

/// Validates, computes, reports, and persists one calculation.
pub fn run_estimate(
    form: &FormInput,
    config: &FootprintConfig,
    options: &EstimateOptions,
    store: Option<&mut dyn CalculationStore>,
) -> Result<EstimateOutcome> {
    println!("\n--- [Workflow] Validating Activity Data ---");
    let input = prepare_input(form, config, &options.use_average);
    let report = ValidationReport::new(&input, &config.ranges);
    print_validation_report(&report, &input, &config.ranges);

    if !report.may_proceed(options.acknowledge) {
        if report.has_errors() {
            error!(
                errors = report.errors().count(),
                "values outside realistic bounds, calculation blocked"
            );
        } else {
            warn!(
                warnings = report.warnings().count(),
                "unusual values need acknowledgement, calculation blocked"
            );
        }
        return Ok(EstimateOutcome::Blocked(report));
    }
    if !report.is_clean() {
        info!(issues = report.issues.len(), "continuing past acknowledged issues");
    }

    println!("\n--- [Workflow] Calculating Footprint ---");
    let result = Estimator::new(&config.factors)
        .with_unit(options.unit)
        .compute(&input);
    let summary = summarize(&result, AVERAGE_ANNUAL_FOOTPRINT_KG);
    info!(total = result.total, unit = result.unit.symbol(), "footprint calculated");

    print_summary_report(&result, &summary);

    if let Some(store) = store {
        let record = CalculationRecord {
            user_id: options.user_id.clone(),
            calculated_at: chrono::Utc::now().to_rfc3339(),
            inputs: input,
            result: result.clone(),
        };
        store.save(&record, &summary)?;
        info!(user = ?record.user_id, "calculation saved to history");
    }

    if let Some(chart_path) = &options.chart {
        plotting::plot_breakdown(chart_path, &result)?;
    }

    Ok(EstimateOutcome::Completed { result, summary })
}

/// Validation only, for checking a form before committing to a calculation.
pub fn run_validate(form: &FormInput, config: &FootprintConfig) -> ValidationReport {
    let input = prepare_input(form, config, &[]);
    let report = ValidationReport::new(&input, &config.ranges);
    print_validation_report(&report, &input, &config.ranges);
    report
}

pub fn print_validation_report(report: &ValidationReport, input: &ActivityInput, ranges: &RangeTable) {
    if report.is_clean() {
        println!("All values are within expected ranges.");
        return;
    }
    let readings = field_values(input);
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        println!("  - [{:<7}] {:<16} {}", label, issue.field.as_str(), issue.message);
        if issue.severity == Severity::Warning {
            if let Some(hint) = readings
                .get(&issue.field)
                .and_then(|reading| field_hint(issue.field, *reading, ranges))
            {
                println!("    {:<26} {}", "", hint);
            }
        }
    }
}

pub fn print_range_table(ranges: &RangeTable) {
    println!("\n--- [Plausibility Ranges] ---");
    println!("  {:<20} {:>8} {:>8} {:>8} {:>8}  unit", "field", "min", "average", "warning", "max");
    for range in ranges.iter() {
        println!(
            "  - {:<18} {:>8} {:>8} {:>8} {:>8}  {}",
            range.field.as_str(),
            range.min,
            range.average,
            range.warning,
            range.max,
            range.unit
        );
    }
}

pub fn print_factor_table(table: &FactorTable) {
    println!("\n--- [Emission Factors] ({} entries) ---", table.len());
    for factor in table.sorted() {
        println!(
            "  - {:<32} {:<6} {:>10.4} {:<10} {}",
            factor.activity,
            factor.period.as_str(),
            factor.value,
            format!("{:?}", factor.unit),
            factor.source.as_deref().unwrap_or("")
        );
    }
}

pub fn print_history(records: &[CalculationRecord]) {
    println!("\n--- [Calculation History] ({} records) ---", records.len());
    for record in records {
        println!(
            "  - {:<32} {:<12} {:>12.2} {}",
            record.calculated_at,
            record.user_id.as_deref().unwrap_or("-"),
            record.result.total,
            record.result.unit.symbol()
        );
    }
}

fn print_summary_report(result: &CalculationResult, summary: &FootprintSummary) {
    let symbol = result.unit.symbol();

    println!("\n\n--- [Footprint Summary Report] ---");
    println!("========================================");
    println!("Annual Footprint: {} {} CO2e", result.headline_total, symbol);
    println!("  (exact: {:.2} {})", result.total, symbol);
    println!("----------------------------------------");

    println!("\nBreakdown by Category:");
    for (category, value) in &result.breakdown {
        let share = if result.total > 0.0 { value / result.total * 100.0 } else { 0.0 };
        println!(
            "  - {:<16} {:>12.2} {} ({:.1}%)",
            category.as_str(),
            value,
            symbol,
            share
        );
    }

    let secondary = &result.secondary;
    if secondary.trip_savings.is_some() || secondary.daily_appliance.is_some() || secondary.weekly_food.is_some() {
        println!("\nLive Figures:");
        if let Some(saved) = secondary.trip_savings {
            println!("  - Trip savings vs. comparison: {:.2} {}", saved, symbol);
        }
        if let Some(daily) = secondary.daily_appliance {
            println!("  - Appliances today:            {:.2} {}", daily, symbol);
        }
        if let Some(weekly) = secondary.weekly_food {
            println!("  - Food this week:              {:.2} {}", weekly, symbol);
        }
    }

    println!("\nCompared with an average footprint:");
    if let Some(category) = summary.dominant_category {
        println!("  - Largest category: {}", category.as_str());
    }
    println!("  - Saved per year: {:.2} kg", summary.saved_kg_per_year);
    println!("  - Saved per week: {:.2} kg", summary.saved_kg_per_week);
    println!("========================================");
}
