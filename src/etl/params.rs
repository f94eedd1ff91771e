//! The Input Validator: turns the loosely-specified per-dataset parameter
//! blocks from a settings file into fully-populated, internally consistent
//! configs.
//!
//! Each kind validates independently but with the same shape: fill defaults,
//! apply cross-field coupling, check every requested table/year/state against
//! the fixed universe in the [`TableRegistry`], then decide between a
//! complete config and the "not requested" signal (`Ok(None)`). Callers must
//! treat `Ok(None)` as "skip this dataset", never as empty work.

use std::fmt;

use crate::constants;
use crate::error::{EtlError, Result};
use crate::etl::partition::PartitionDimension;
use crate::registry::TableRegistry;
use crate::settings::RawDatasetParams;

/// The five recognized dataset kinds. `ALL` is the fixed order packages are
/// processed in, regardless of settings-file insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKind {
    Generators,
    Finance,
    Emissions,
    Reference,
    Linkage,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::Generators,
        DatasetKind::Finance,
        DatasetKind::Emissions,
        DatasetKind::Reference,
        DatasetKind::Linkage,
    ];

    pub fn parse(key: &str) -> Result<Self> {
        match key {
            constants::GENERATORS_KIND => Ok(DatasetKind::Generators),
            constants::FINANCE_KIND => Ok(DatasetKind::Finance),
            constants::EMISSIONS_KIND => Ok(DatasetKind::Emissions),
            constants::REFERENCE_KIND => Ok(DatasetKind::Reference),
            constants::LINKAGE_KIND => Ok(DatasetKind::Linkage),
            _ => Err(EtlError::Config(format!(
                "Invalid dataset '{key}' found in input"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Generators => constants::GENERATORS_KIND,
            DatasetKind::Finance => constants::FINANCE_KIND,
            DatasetKind::Emissions => constants::EMISSIONS_KIND,
            DatasetKind::Reference => constants::REFERENCE_KIND,
            DatasetKind::Linkage => constants::LINKAGE_KIND,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-validated dataset configuration. Once constructed, every field is
/// populated and consistent; adapters consume these without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetConfig {
    Generators(GeneratorsConfig),
    Finance(FinanceConfig),
    Emissions(EmissionsConfig),
    Reference(ReferenceConfig),
    Linkage(LinkageConfig),
}

impl DatasetConfig {
    pub fn kind(&self) -> DatasetKind {
        match self {
            DatasetConfig::Generators(_) => DatasetKind::Generators,
            DatasetConfig::Finance(_) => DatasetKind::Finance,
            DatasetConfig::Emissions(_) => DatasetKind::Emissions,
            DatasetConfig::Reference(_) => DatasetKind::Reference,
            DatasetConfig::Linkage(_) => DatasetKind::Linkage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorsConfig {
    pub generator_years: Vec<i32>,
    pub generator_tables: Vec<String>,
    pub filing_years: Vec<i32>,
    pub filing_tables: Vec<String>,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinanceConfig {
    pub finance_years: Vec<i32>,
    pub finance_tables: Vec<String>,
    pub finance_testing: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionsConfig {
    pub emissions_years: Vec<i32>,
    pub emissions_states: Vec<String>,
    pub partition: PartitionDimension,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConfig {
    pub reference_tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkageConfig {
    pub generators: bool,
    pub finance: bool,
}

/// Validates one raw parameter block for the given kind. `Ok(None)` means the
/// dataset is not requested at all.
pub fn validate_dataset(
    kind: DatasetKind,
    raw: &RawDatasetParams,
    registry: &TableRegistry,
) -> Result<Option<DatasetConfig>> {
    Ok(match kind {
        DatasetKind::Generators => {
            validate_generators(raw, registry)?.map(DatasetConfig::Generators)
        }
        DatasetKind::Finance => validate_finance(raw, registry)?.map(DatasetConfig::Finance),
        DatasetKind::Emissions => validate_emissions(raw, registry)?.map(DatasetConfig::Emissions),
        DatasetKind::Reference => validate_reference(raw, registry)?.map(DatasetConfig::Reference),
        DatasetKind::Linkage => validate_linkage(raw)?.map(DatasetConfig::Linkage),
    })
}

fn check_tables(requested: &[String], universe: &[String], what: &str) -> Result<()> {
    for table in requested {
        if !universe.contains(table) {
            return Err(EtlError::Config(format!(
                "Unrecognized {what}: {table}"
            )));
        }
    }
    Ok(())
}

fn check_years(requested: &[i32], universe: &[i32], what: &str) -> Result<()> {
    for year in requested {
        if !universe.contains(year) {
            return Err(EtlError::Config(format!("Unrecognized {what}: {year}")));
        }
    }
    Ok(())
}

pub fn validate_generators(
    raw: &RawDatasetParams,
    registry: &TableRegistry,
) -> Result<Option<GeneratorsConfig>> {
    let mut generator_years = raw.generator_years.clone().unwrap_or_default();
    let generator_tables = raw
        .generator_tables
        .clone()
        .unwrap_or_else(|| registry.generator_tables.clone());
    let mut filing_years = raw.filing_years.clone().unwrap_or_default();
    let mut filing_tables = raw
        .filing_tables
        .clone()
        .unwrap_or_else(|| registry.filing_tables.clone());
    let debug = raw.debug.unwrap_or(false);

    // If only the generator form is requested, the harmonization pass still
    // needs the companion filing data for cross-referencing, so force the
    // same years plus the minimal filing subset.
    if filing_years.is_empty() && !generator_years.is_empty() {
        filing_years = generator_years.clone();
        filing_tables = registry.minimal_filing_tables.clone();
    }

    // And the filing form can't be harvested without matching generator
    // years either, so the inverse inference applies too.
    if generator_years.is_empty() && !filing_years.is_empty() {
        generator_years = filing_years.clone();
    }

    if !debug {
        check_tables(&generator_tables, &registry.generator_tables, "generator table")?;
        check_tables(&filing_tables, &registry.filing_tables, "filing table")?;
    }
    check_years(&generator_years, &registry.generator_years, "generator year")?;
    check_years(&filing_years, &registry.filing_years, "filing year")?;

    if generator_years.is_empty() && filing_years.is_empty() {
        return Ok(None);
    }
    Ok(Some(GeneratorsConfig {
        generator_years,
        generator_tables,
        filing_years,
        filing_tables,
        debug,
    }))
}

pub fn validate_finance(
    raw: &RawDatasetParams,
    registry: &TableRegistry,
) -> Result<Option<FinanceConfig>> {
    let finance_years = raw.finance_years.clone().unwrap_or_default();
    let finance_tables = raw
        .finance_tables
        .clone()
        .unwrap_or_else(|| registry.finance_tables.clone());
    let finance_testing = raw.finance_testing.unwrap_or(false);
    let debug = raw.debug.unwrap_or(false);

    if !debug {
        check_tables(&finance_tables, &registry.finance_tables, "finance table")?;
    }
    check_years(&finance_years, &registry.finance_years, "finance year")?;

    if finance_years.is_empty() {
        return Ok(None);
    }
    Ok(Some(FinanceConfig {
        finance_years,
        finance_tables,
        finance_testing,
        debug,
    }))
}

pub fn validate_emissions(
    raw: &RawDatasetParams,
    registry: &TableRegistry,
) -> Result<Option<EmissionsConfig>> {
    let emissions_years = raw.emissions_years.clone().unwrap_or_default();
    let mut emissions_states = raw.emissions_states.clone().unwrap_or_default();

    // A leading "all" expands to the whole state universe.
    if emissions_states
        .first()
        .map(|s| s.eq_ignore_ascii_case("all"))
        .unwrap_or(false)
    {
        emissions_states = registry.emissions_states.clone();
    } else {
        for state in &mut emissions_states {
            *state = state.to_uppercase();
        }
    }

    // Skip before the partition check: an empty raw config must resolve to
    // "not requested" rather than a partition error.
    if emissions_years.is_empty() || emissions_states.is_empty() {
        return Ok(None);
    }

    let partition = match raw.partition.as_deref() {
        Some(field) => PartitionDimension::parse(field).ok_or_else(|| {
            EtlError::Config(format!(
                "Unrecognized partition dimension for emissions: {field}"
            ))
        })?,
        None => {
            return Err(EtlError::Config(
                "No partition found for emissions; the hourly feed requires either \
                 years or states as a partition"
                    .to_string(),
            ))
        }
    };

    check_years(&emissions_years, &registry.emissions_years, "emissions year")?;
    for state in &emissions_states {
        if !registry.contains_state(state) {
            return Err(EtlError::Config(format!(
                "Unrecognized emissions state: {state}"
            )));
        }
    }

    Ok(Some(EmissionsConfig {
        emissions_years,
        emissions_states,
        partition,
    }))
}

pub fn validate_reference(
    raw: &RawDatasetParams,
    registry: &TableRegistry,
) -> Result<Option<ReferenceConfig>> {
    let reference_tables = raw
        .reference_tables
        .clone()
        .unwrap_or_else(|| registry.reference_tables.clone());

    check_tables(&reference_tables, &registry.reference_tables, "reference table")?;

    if reference_tables.is_empty() {
        return Ok(None);
    }
    Ok(Some(ReferenceConfig { reference_tables }))
}

pub fn validate_linkage(raw: &RawDatasetParams) -> Result<Option<LinkageConfig>> {
    let generators = raw.generators.unwrap_or(false);
    let finance = raw.finance.unwrap_or(false);
    if !generators && !finance {
        return Ok(None);
    }
    Ok(Some(LinkageConfig { generators, finance }))
}

/// Projects a validated config back into raw parameter form. Re-validating
/// the result yields an identical config, which callers rely on when
/// settings round-trip through files.
impl From<&DatasetConfig> for RawDatasetParams {
    fn from(config: &DatasetConfig) -> Self {
        let mut raw = RawDatasetParams::default();
        match config {
            DatasetConfig::Generators(c) => {
                raw.generator_years = Some(c.generator_years.clone());
                raw.generator_tables = Some(c.generator_tables.clone());
                raw.filing_years = Some(c.filing_years.clone());
                raw.filing_tables = Some(c.filing_tables.clone());
                raw.debug = Some(c.debug);
            }
            DatasetConfig::Finance(c) => {
                raw.finance_years = Some(c.finance_years.clone());
                raw.finance_tables = Some(c.finance_tables.clone());
                raw.finance_testing = Some(c.finance_testing);
                raw.debug = Some(c.debug);
            }
            DatasetConfig::Emissions(c) => {
                raw.emissions_years = Some(c.emissions_years.clone());
                raw.emissions_states = Some(c.emissions_states.clone());
                raw.partition = Some(c.partition.raw_key().to_string());
            }
            DatasetConfig::Reference(c) => {
                raw.reference_tables = Some(c.reference_tables.clone());
            }
            DatasetConfig::Linkage(c) => {
                raw.generators = Some(c.generators);
                raw.finance = Some(c.finance);
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TableRegistry {
        TableRegistry::default()
    }

    fn raw() -> RawDatasetParams {
        RawDatasetParams::default()
    }

    #[test]
    fn empty_raw_config_never_yields_partial_config() {
        let reg = registry();
        for kind in DatasetKind::ALL {
            let validated = validate_dataset(kind, &raw(), &reg).unwrap();
            match (kind, validated) {
                // Reference defaults to the full table universe, so an empty
                // block is an active, fully-defaulted request.
                (DatasetKind::Reference, Some(DatasetConfig::Reference(c))) => {
                    assert_eq!(c.reference_tables, reg.reference_tables);
                }
                (DatasetKind::Reference, other) => panic!("unexpected: {other:?}"),
                // Everything else resolves to "not requested".
                (_, None) => {}
                (k, other) => panic!("{k} yielded {other:?} from an empty config"),
            }
        }
    }

    #[test]
    fn generator_years_imply_filing_years_and_minimal_tables() {
        let mut params = raw();
        params.generator_years = Some(vec![2018]);
        let cfg = validate_generators(&params, &registry()).unwrap().unwrap();
        assert_eq!(cfg.filing_years, vec![2018]);
        assert_eq!(cfg.filing_tables, registry().minimal_filing_tables);
        // The generator side keeps its full default table universe.
        assert_eq!(cfg.generator_tables, registry().generator_tables);
    }

    #[test]
    fn filing_years_imply_generator_years() {
        let mut params = raw();
        params.filing_years = Some(vec![2018]);
        let cfg = validate_generators(&params, &registry()).unwrap().unwrap();
        assert_eq!(cfg.generator_years, vec![2018]);
        assert_eq!(cfg.filing_tables, registry().filing_tables);
    }

    #[test]
    fn unknown_generator_table_is_a_config_error() {
        let mut params = raw();
        params.generator_years = Some(vec![2018]);
        params.generator_tables = Some(vec!["not_a_table".to_string()]);
        let err = validate_generators(&params, &registry()).unwrap_err();
        assert!(matches!(err, EtlError::Config(_)), "got {err:?}");
    }

    #[test]
    fn debug_mode_relaxes_table_validation_only() {
        let mut params = raw();
        params.generator_years = Some(vec![2018]);
        params.generator_tables = Some(vec!["not_yet_supported".to_string()]);
        params.debug = Some(true);
        let cfg = validate_generators(&params, &registry()).unwrap().unwrap();
        assert!(cfg.debug);

        // Year validation stays strict even in debug mode.
        params.generator_years = Some(vec![1850]);
        assert!(validate_generators(&params, &registry()).is_err());
    }

    #[test]
    fn finance_defaults_and_skip() {
        let reg = registry();
        let mut params = raw();
        params.finance_years = Some(vec![2016, 2017]);
        let cfg = validate_finance(&params, &reg).unwrap().unwrap();
        assert_eq!(cfg.finance_tables, reg.finance_tables);
        assert!(!cfg.finance_testing);

        // No years at all means the dataset is not requested.
        assert!(validate_finance(&raw(), &reg).unwrap().is_none());
    }

    #[test]
    fn finance_rejects_year_outside_universe() {
        let mut params = raw();
        params.finance_years = Some(vec![1898]);
        assert!(validate_finance(&params, &registry()).is_err());
    }

    #[test]
    fn emissions_all_expands_states() {
        let reg = registry();
        let mut params = raw();
        params.emissions_years = Some(vec![2018]);
        params.emissions_states = Some(vec!["all".to_string()]);
        params.partition = Some("emissions_years".to_string());
        let cfg = validate_emissions(&params, &reg).unwrap().unwrap();
        assert_eq!(cfg.emissions_states, reg.emissions_states);
        assert_eq!(cfg.partition, PartitionDimension::Years);
    }

    #[test]
    fn emissions_without_partition_is_fatal() {
        let mut params = raw();
        params.emissions_years = Some(vec![2018]);
        params.emissions_states = Some(vec!["WA".to_string()]);
        let err = validate_emissions(&params, &registry()).unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
    }

    #[test]
    fn emissions_with_missing_dimension_skips_before_partition_check() {
        // Years but no states: not requested, even though no partition is
        // resolvable either.
        let mut params = raw();
        params.emissions_years = Some(vec![2018]);
        assert!(validate_emissions(&params, &registry()).unwrap().is_none());
    }

    #[test]
    fn emissions_states_are_normalized_and_checked() {
        let mut params = raw();
        params.emissions_years = Some(vec![2018]);
        params.emissions_states = Some(vec!["wa".to_string()]);
        params.partition = Some("emissions_states".to_string());
        let cfg = validate_emissions(&params, &registry()).unwrap().unwrap();
        assert_eq!(cfg.emissions_states, vec!["WA"]);

        params.emissions_states = Some(vec!["ZZ".to_string()]);
        assert!(validate_emissions(&params, &registry()).is_err());
    }

    #[test]
    fn linkage_requires_at_least_one_flag() {
        let reg = registry();
        assert!(validate_dataset(DatasetKind::Linkage, &raw(), &reg)
            .unwrap()
            .is_none());

        let mut params = raw();
        params.finance = Some(true);
        let cfg = validate_linkage(&params).unwrap().unwrap();
        assert!(cfg.finance);
        assert!(!cfg.generators);
    }

    #[test]
    fn unrecognized_kind_is_a_config_error() {
        let err = DatasetKind::parse("weather").unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
    }

    #[test]
    fn revalidation_is_idempotent_for_every_kind() {
        let reg = registry();
        let mut gen = raw();
        gen.generator_years = Some(vec![2018]);
        let mut fin = raw();
        fin.finance_years = Some(vec![2017]);
        let mut emi = raw();
        emi.emissions_years = Some(vec![2017, 2018]);
        emi.emissions_states = Some(vec!["WA".to_string(), "OR".to_string()]);
        emi.partition = Some("emissions_years".to_string());
        let mut lnk = raw();
        lnk.generators = Some(true);

        let firsts = vec![
            validate_dataset(DatasetKind::Generators, &gen, &reg).unwrap().unwrap(),
            validate_dataset(DatasetKind::Finance, &fin, &reg).unwrap().unwrap(),
            validate_dataset(DatasetKind::Emissions, &emi, &reg).unwrap().unwrap(),
            validate_dataset(DatasetKind::Reference, &raw(), &reg).unwrap().unwrap(),
            validate_dataset(DatasetKind::Linkage, &lnk, &reg).unwrap().unwrap(),
        ];
        for first in firsts {
            let reraw = RawDatasetParams::from(&first);
            let second = validate_dataset(first.kind(), &reraw, &reg)
                .unwrap()
                .unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn restricted_registry_is_honored() {
        let mut reg = registry();
        reg.finance_tables = vec!["fuel_finance".to_string()];
        let mut params = raw();
        params.finance_years = Some(vec![2018]);
        params.finance_tables = Some(vec!["plants_steam_finance".to_string()]);
        // Valid against the default universe, but not against the injected one.
        assert!(validate_finance(&params, &reg).is_err());
    }
}
