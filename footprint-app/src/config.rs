use anyhow::{Context, Result};
use footprint_core::{factors::FactorTable, validation::RangeTable};
use footprint_schemas::{
    file_formats::{FactorFile, RangeFile},
    form::FormInput,
};
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Coefficient and plausibility tables for a run: the built-in values with any
/// override files layered on top.
pub struct FootprintConfig {
    pub factors: FactorTable,
    pub ranges: RangeTable,
}

impl FootprintConfig {
    pub fn builtin() -> Self {
        Self {
            factors: FactorTable::builtin(),
            ranges: RangeTable::builtin(),
        }
    }

    /// Loads overrides from `factors_path` and `ranges_path`. Each may be a single
    /// YAML file or a directory of them, applied in file-name order.
    pub fn load(factors_path: Option<&Path>, ranges_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::builtin();

        if let Some(path) = factors_path {
            for (file_path, file) in load_yaml_files::<FactorFile>(path)? {
                let count = file.factors.len();
                config.factors = config
                    .factors
                    .with_file(file)
                    .with_context(|| format!("Invalid factor file {:?}", file_path))?;
                info!(path = ?file_path, count, "factor overrides loaded");
            }
        }

        if let Some(path) = ranges_path {
            for (file_path, file) in load_yaml_files::<RangeFile>(path)? {
                let count = file.ranges.len();
                config.ranges = config
                    .ranges
                    .with_file(file)
                    .with_context(|| format!("Invalid range file {:?}", file_path))?;
                info!(path = ?file_path, count, "range overrides loaded");
            }
        }

        Ok(config)
    }
}

/// Reads a form snapshot from a YAML file.
pub fn load_form(path: &Path) -> Result<FormInput> {
    read_yaml(path)
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML from {:?}", path))
}

/// Parses `path` if it is a file, or every `.yaml`/`.yml` file directly inside it
/// if it is a directory.
fn load_yaml_files<T: DeserializeOwned>(path: &Path) -> Result<Vec<(PathBuf, T)>> {
    if path.is_file() {
        return Ok(vec![(path.to_path_buf(), read_yaml(path)?)]);
    }

    let mut paths = Vec::new();
    for entry in
        fs::read_dir(path).with_context(|| format!("Failed to read directory: {:?}", path))?
    {
        let entry_path = entry?.path();
        if entry_path.is_file()
            && entry_path.extension().map_or(false, |s| s == "yaml" || s == "yml")
        {
            paths.push(entry_path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|p| {
            let parsed = read_yaml(&p)?;
            Ok((p, parsed))
        })
        .collect()
}
