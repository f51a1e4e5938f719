//! Chart output for a finished calculation.

use anyhow::Result;
use footprint_schemas::result::CalculationResult;
use plotters::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Draws the per-category breakdown as a bar chart and saves it as a PNG.
pub fn plot_breakdown(path: &Path, result: &CalculationResult) -> Result<()> {
    if result.breakdown.is_empty() {
        warn!("no categories selected, skipping breakdown chart");
        return Ok(());
    }

    let labels: Vec<&str> = result.breakdown.keys().map(|c| c.as_str()).collect();
    let values: Vec<f64> = result.breakdown.values().copied().collect();
    let max_value = values.iter().copied().fold(0.0, f64::max).max(1.0);
    let symbol = result.unit.symbol();

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Annual Footprint: {} {} CO2e", result.total, symbol),
            ("sans-serif", 40).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0u32..values.len() as u32).into_segmented(),
            0f64..max_value * 1.1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Category")
        .y_desc(format!("CO2e ({})", symbol))
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).map_or_else(String::new, |l| l.to_string())
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(GREEN.filled())
            .margin(30)
            .data(values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;

    root.present()?;
    info!(path = ?path, "breakdown chart saved");
    Ok(())
}
