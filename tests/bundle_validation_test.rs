//! End-to-end validation of the shipped demo settings file.

use std::path::Path;

use gridpack::etl::params::{DatasetConfig, DatasetKind};
use gridpack::etl::package::validate_bundle;
use gridpack::registry::TableRegistry;
use gridpack::settings::BundleSettings;

fn demo_settings() -> BundleSettings {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("settings/bundle_demo.toml");
    BundleSettings::load(&path).unwrap()
}

#[test]
fn demo_bundle_validates_in_full() {
    let settings = demo_settings();
    let packages = validate_bundle(&settings, &TableRegistry::default()).unwrap();

    assert_eq!(packages.len(), 3);
    let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["core-annual", "hourly-emissions-2018", "reference-only"]);
}

#[test]
fn generator_entry_infers_companion_filing_subset() {
    let settings = demo_settings();
    let registry = TableRegistry::default();
    let packages = validate_bundle(&settings, &registry).unwrap();

    let core = &packages[0];
    assert_eq!(core.datasets.len(), 3);

    let generators = core
        .datasets
        .iter()
        .find_map(|d| match d {
            DatasetConfig::Generators(c) => Some(c),
            _ => None,
        })
        .expect("core-annual carries a generators dataset");

    // Only generator years appear in the settings file; the filing side is
    // inferred with the same years and the minimal table subset.
    assert_eq!(generators.generator_years, vec![2017, 2018]);
    assert_eq!(generators.filing_years, vec![2017, 2018]);
    assert_eq!(generators.filing_tables, registry.minimal_filing_tables);
    assert_eq!(generators.generator_tables, registry.generator_tables);
}

#[test]
fn empty_reference_entry_defaults_to_every_table() {
    let settings = demo_settings();
    let registry = TableRegistry::default();
    let packages = validate_bundle(&settings, &registry).unwrap();

    let reference = packages
        .iter()
        .find(|p| p.name == "reference-only")
        .unwrap();
    assert_eq!(reference.datasets.len(), 1);
    assert_eq!(reference.datasets[0].kind(), DatasetKind::Reference);
    match &reference.datasets[0] {
        DatasetConfig::Reference(c) => {
            assert_eq!(c.reference_tables, registry.reference_tables);
        }
        other => panic!("unexpected dataset: {other:?}"),
    }
}

#[test]
fn unreadable_settings_path_is_a_config_error() {
    let err = BundleSettings::load(Path::new("does/not/exist.toml")).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.toml"));
}
