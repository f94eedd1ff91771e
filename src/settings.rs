use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EtlError, Result};

/// A whole bundle settings file: an ordered list of package descriptors.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleSettings {
    pub packages: Vec<PackageSpec>,
}

/// One raw package descriptor. `datasets` is an ordered list of single-key
/// mappings from dataset kind to its loose parameter block; validation turns
/// each entry into a typed config (or drops it as "not requested").
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub datasets: Vec<BTreeMap<String, RawDatasetParams>>,
}

/// Loosely-specified per-dataset parameters as they appear in a settings
/// file. Every field is optional; absent fields take kind-specific defaults
/// during validation. One shared shape covers all five kinds — each
/// validator only reads the fields that belong to its kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawDatasetParams {
    // generator survey kind
    pub generator_years: Option<Vec<i32>>,
    pub generator_tables: Option<Vec<String>>,
    pub filing_years: Option<Vec<i32>>,
    pub filing_tables: Option<Vec<String>>,

    // finance kind
    pub finance_years: Option<Vec<i32>>,
    pub finance_tables: Option<Vec<String>>,
    pub finance_testing: Option<bool>,

    // emissions kind
    pub emissions_years: Option<Vec<i32>>,
    pub emissions_states: Option<Vec<String>>,
    pub partition: Option<String>,

    // reference kind
    pub reference_tables: Option<Vec<String>>,

    // linkage kind flags
    pub generators: Option<bool>,
    pub finance: Option<bool>,

    // relaxes table validation for not-yet-fully-supported tables
    pub debug: Option<bool>,
}

impl BundleSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let settings: BundleSettings = toml::from_str(&content)?;
        Ok(settings)
    }
}

/// Resolves the bundle output directory, preferring `GRIDPACK_BUNDLE_DIR`.
pub fn default_bundle_dir() -> PathBuf {
    match std::env::var("GRIDPACK_BUNDLE_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("output/bundles"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_bundle_file() {
        let toml_src = r#"
            [[packages]]
            name = "core-annual"
            title = "Core annual data"
            description = "Generator survey plus finance filings"

            [[packages.datasets]]
            [packages.datasets.generators]
            generator_years = [2017, 2018]

            [[packages.datasets]]
            [packages.datasets.finance]
            finance_years = [2018]
            finance_tables = ["fuel_finance"]
        "#;
        let settings: BundleSettings = toml::from_str(toml_src).unwrap();
        assert_eq!(settings.packages.len(), 1);
        let pkg = &settings.packages[0];
        assert_eq!(pkg.name, "core-annual");
        assert_eq!(pkg.datasets.len(), 2);
        let gen = pkg.datasets[0].get("generators").unwrap();
        assert_eq!(gen.generator_years, Some(vec![2017, 2018]));
        assert_eq!(gen.filing_years, None);
    }

    #[test]
    fn absent_fields_deserialize_as_none() {
        let raw: RawDatasetParams = toml::from_str("emissions_years = [2018]").unwrap();
        assert_eq!(raw.emissions_years, Some(vec![2018]));
        assert_eq!(raw.emissions_states, None);
        assert_eq!(raw.partition, None);
        assert_eq!(raw.debug, None);
    }
}
