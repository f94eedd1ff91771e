//! Package and bundle coordination: validates a whole bundle up front,
//! prepares per-package output directories, dispatches the dataset adapters
//! in a fixed order, and assembles the final manifest.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::error::{EtlError, Result};
use crate::etl::emissions::etl_emissions;
use crate::etl::finance::etl_finance;
use crate::etl::generators::etl_generators;
use crate::etl::linkage::etl_linkage;
use crate::etl::params::{validate_dataset, DatasetConfig, DatasetKind};
use crate::etl::ports::SourceSet;
use crate::etl::reference::etl_reference;
use crate::load::TableWriter;
use crate::registry::TableRegistry;
use crate::settings::BundleSettings;

/// One validated package: name/title/description plus only the dataset
/// entries that validated as requested.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub name: String,
    pub title: String,
    pub description: String,
    pub datasets: Vec<DatasetConfig>,
}

/// The final output of a bundle run: which tables each package produced.
/// Append-only during the run, immutable once handed back.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub bundle_id: Uuid,
    pub created: DateTime<Utc>,
    pub packages: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    fn new() -> Self {
        Self {
            bundle_id: Uuid::new_v4(),
            created: Utc::now(),
            packages: BTreeMap::new(),
        }
    }

    pub fn tables_for(&self, package: &str) -> Option<&[String]> {
        self.packages.get(package).map(|t| t.as_slice())
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Validates every package in a bundle before any I/O begins, so that
/// configuration mistakes abort up front rather than partway through an
/// hours-long load.
///
/// A package whose every dataset resolves to "not requested" is dropped
/// from the bundle without error; packages keep only the entries that
/// validated. Duplicate package names and unrecognized dataset kinds are
/// fatal configuration errors.
pub fn validate_bundle(
    settings: &BundleSettings,
    registry: &TableRegistry,
) -> Result<Vec<PackageConfig>> {
    let mut validated = Vec::new();
    let mut seen_names = HashSet::new();

    for pkg in &settings.packages {
        if !seen_names.insert(pkg.name.clone()) {
            return Err(EtlError::Config(format!(
                "Duplicate package name in bundle: {}",
                pkg.name
            )));
        }

        let mut datasets = Vec::new();
        for entry in &pkg.datasets {
            for (key, raw) in entry {
                let kind = DatasetKind::parse(key)?;
                match validate_dataset(kind, raw, registry)? {
                    Some(config) => datasets.push(config),
                    None => info!(
                        "Dataset '{}' in package '{}' requested nothing; skipping",
                        key, pkg.name
                    ),
                }
            }
        }

        if datasets.is_empty() {
            info!("Dropping package '{}': no datasets requested", pkg.name);
            continue;
        }
        validated.push(PackageConfig {
            name: pkg.name.clone(),
            title: pkg.title.clone(),
            description: pkg.description.clone(),
            datasets,
        });
    }
    Ok(validated)
}

/// Recreates the package output directory.
///
/// DESTRUCTIVE: any prior contents of `<bundle_dir>/<name>/` are removed
/// before the `data/` subdirectory is created fresh.
fn prep_package_dir(pkg_dir: &Path) -> Result<()> {
    if pkg_dir.exists() {
        fs::remove_dir_all(pkg_dir)?;
    }
    fs::create_dir_all(pkg_dir.join("data"))?;
    Ok(())
}

/// Runs every dataset of one validated package and returns the table names
/// produced, in processing order.
pub async fn etl_package(
    pkg: &PackageConfig,
    bundle_dir: &Path,
    sources: &SourceSet,
    writer: &dyn TableWriter,
) -> Result<Vec<String>> {
    let pkg_dir = bundle_dir.join(&pkg.name);
    prep_package_dir(&pkg_dir)?;

    let mut tables = Vec::new();
    // Datasets run in kind enumeration order, not settings insertion order,
    // so output is deterministic for any equivalent settings file.
    for kind in DatasetKind::ALL {
        for dataset in pkg.datasets.iter().filter(|d| d.kind() == kind) {
            let produced = match dataset {
                DatasetConfig::Generators(config) => {
                    etl_generators(config, sources, writer, &pkg_dir).await?
                }
                DatasetConfig::Finance(config) => {
                    etl_finance(config, sources, writer, &pkg_dir).await?
                }
                DatasetConfig::Emissions(config) => {
                    etl_emissions(config, sources, writer, &pkg_dir).await?
                }
                DatasetConfig::Reference(config) => {
                    etl_reference(config, sources, writer, &pkg_dir).await?
                }
                DatasetConfig::Linkage(config) => {
                    etl_linkage(config, sources, writer, &pkg_dir).await?
                }
            };
            tables.extend(produced);
        }
    }
    Ok(tables)
}

/// Processes every validated package sequentially and returns the manifest.
pub async fn run_bundle(
    packages: &[PackageConfig],
    bundle_dir: &Path,
    sources: &SourceSet,
    writer: &dyn TableWriter,
) -> Result<Manifest> {
    fs::create_dir_all(bundle_dir)?;
    let mut manifest = Manifest::new();
    for pkg in packages {
        info!("Processing package '{}'", pkg.name);
        let tables = etl_package(pkg, bundle_dir, sources, writer).await?;
        info!("Package '{}' produced {} tables", pkg.name, tables.len());
        manifest.packages.insert(pkg.name.clone(), tables);
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{PackageSpec, RawDatasetParams};
    use std::collections::BTreeMap;

    fn spec(name: &str, datasets: Vec<BTreeMap<String, RawDatasetParams>>) -> PackageSpec {
        PackageSpec {
            name: name.to_string(),
            title: format!("{name} title"),
            description: String::new(),
            datasets,
        }
    }

    fn entry(kind: &str, raw: RawDatasetParams) -> BTreeMap<String, RawDatasetParams> {
        let mut map = BTreeMap::new();
        map.insert(kind.to_string(), raw);
        map
    }

    #[test]
    fn all_empty_packages_yield_an_empty_bundle() {
        let settings = BundleSettings {
            packages: vec![
                spec("a", vec![entry("generators", RawDatasetParams::default())]),
                spec("b", vec![entry("linkage", RawDatasetParams::default())]),
            ],
        };
        let validated = validate_bundle(&settings, &TableRegistry::default()).unwrap();
        assert!(validated.is_empty());
    }

    #[test]
    fn packages_retain_only_validated_entries() {
        let mut finance = RawDatasetParams::default();
        finance.finance_years = Some(vec![2018]);
        let settings = BundleSettings {
            packages: vec![spec(
                "mixed",
                vec![
                    entry("finance", finance),
                    entry("linkage", RawDatasetParams::default()),
                ],
            )],
        };
        let validated = validate_bundle(&settings, &TableRegistry::default()).unwrap();
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].datasets.len(), 1);
        assert_eq!(validated[0].datasets[0].kind(), DatasetKind::Finance);
    }

    #[test]
    fn duplicate_package_names_are_rejected() {
        let mut finance = RawDatasetParams::default();
        finance.finance_years = Some(vec![2018]);
        let settings = BundleSettings {
            packages: vec![
                spec("same", vec![entry("finance", finance.clone())]),
                spec("same", vec![entry("finance", finance)]),
            ],
        };
        let err = validate_bundle(&settings, &TableRegistry::default()).unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
    }

    #[test]
    fn unrecognized_dataset_kind_is_fatal() {
        let settings = BundleSettings {
            packages: vec![spec(
                "bad",
                vec![entry("weather", RawDatasetParams::default())],
            )],
        };
        let err = validate_bundle(&settings, &TableRegistry::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid dataset"));
    }
}
