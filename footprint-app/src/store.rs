use anyhow::{Context, Result};
use csv::WriterBuilder;
use footprint_core::summary::FootprintSummary;
use footprint_schemas::{
    activity::Category,
    result::{CalculationRecord, CalculationResult, MassUnit},
};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

/// Destination for finished calculations. The estimator never calls this itself;
/// the workflow hands over a record once a calculation has been accepted.
pub trait CalculationStore {
    fn save(&mut self, record: &CalculationRecord, summary: &FootprintSummary) -> Result<()>;
}

/// One CSV row. Nested values are kept as JSON strings so the file stays flat.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    calculated_at: String,
    user_id: Option<String>,
    unit: MassUnit,
    total: f64,
    headline_total: i64,
    total_kg: f64,
    dominant_category: Option<Category>,
    saved_kg_per_year: f64,
    saved_kg_per_week: f64,
    breakdown_json: String,
    secondary_json: String,
    inputs_json: String,
}

/// Appends every calculation to a CSV history file, writing the header only when
/// the file is new.
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every stored calculation, oldest first.
    pub fn records(&self) -> Result<Vec<CalculationRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open history {:?}", self.path))?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let row: HistoryRow = row.with_context(|| format!("Malformed row in {:?}", self.path))?;
            records.push(CalculationRecord {
                user_id: row.user_id,
                calculated_at: row.calculated_at,
                inputs: serde_json::from_str(&row.inputs_json)?,
                result: CalculationResult {
                    unit: row.unit,
                    total: row.total,
                    headline_total: row.headline_total,
                    total_kg: row.total_kg,
                    breakdown: serde_json::from_str(&row.breakdown_json)?,
                    secondary: serde_json::from_str(&row.secondary_json)?,
                },
            });
        }
        Ok(records)
    }
}

impl CalculationStore for CsvHistoryStore {
    fn save(&mut self, record: &CalculationRecord, summary: &FootprintSummary) -> Result<()> {
        let is_new = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history {:?}", self.path))?;
        let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);

        let row = HistoryRow {
            calculated_at: record.calculated_at.clone(),
            user_id: record.user_id.clone(),
            unit: record.result.unit,
            total: record.result.total,
            headline_total: record.result.headline_total,
            total_kg: record.result.total_kg,
            dominant_category: summary.dominant_category,
            saved_kg_per_year: summary.saved_kg_per_year,
            saved_kg_per_week: summary.saved_kg_per_week,
            breakdown_json: serde_json::to_string(&record.result.breakdown)?,
            secondary_json: serde_json::to_string(&record.result.secondary)?,
            inputs_json: serde_json::to_string(&record.inputs)?,
        };

        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_core::{estimate::compute, factors::FactorTable, summary::summarize};
    use footprint_schemas::activity::{
        ActivityInput, CategoryInput, RecyclingFrequency, WasteInput,
    };

    fn record(user: Option<&str>, recycling: RecyclingFrequency) -> (CalculationRecord, FootprintSummary) {
        let inputs = ActivityInput {
            active: [Category::Waste].into_iter().collect(),
            entries: vec![CategoryInput::Waste(WasteInput {
                recycling: Some(recycling),
            })],
        };
        let result = compute(&inputs, &FactorTable::builtin());
        let summary = summarize(&result, 16_000.0);
        let record = CalculationRecord {
            user_id: user.map(str::to_string),
            calculated_at: "2026-10-16T09:30:00Z".to_string(),
            inputs,
            result,
        };
        (record, summary)
    }

    #[test]
    fn saved_records_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvHistoryStore::new(dir.path().join("history.csv"));

        let (first, first_summary) = record(Some("u-1"), RecyclingFrequency::Always);
        let (second, second_summary) = record(None, RecyclingFrequency::Rarely);
        store.save(&first, &first_summary).unwrap();
        store.save(&second, &second_summary).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[test]
    fn header_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let (rec, summary) = record(Some("u-1"), RecyclingFrequency::Sometimes);

        CsvHistoryStore::new(&path).save(&rec, &summary).unwrap();
        CsvHistoryStore::new(&path).save(&rec, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("calculated_at").count(), 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn summary_columns_are_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let (rec, summary) = record(None, RecyclingFrequency::Always);
        CsvHistoryStore::new(&path).save(&rec, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(",waste,15600"));
    }

    #[test]
    fn missing_history_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvHistoryStore::new(dir.path().join("none.csv")).records().is_err());
    }
}
