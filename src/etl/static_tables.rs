//! The Static Table Loader: materializes the small reference/lookup tables
//! derived from built-in constants.
//!
//! Many values in the source data are essentially constant codes (fuel
//! types, prime movers, account numbers) that downstream consumers need as
//! foreign-key targets. These tables are pure functions of `constants` —
//! deterministic, no external inputs — and get written whenever their kind
//! is active in a package, even if no dynamic data was requested.

use std::path::Path;

use crate::constants;
use crate::error::Result;
use crate::load::TableWriter;
use crate::table::{Table, TableMap};

pub async fn load_static_generators(
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    let mut tables = TableMap::new();
    tables.insert(
        "fuel_types_filing".to_string(),
        Table::from_pairs("abbr", "fuel_type", constants::FUEL_TYPES),
    );
    tables.insert(
        "prime_movers_filing".to_string(),
        Table::from_pairs("abbr", "prime_mover", constants::PRIME_MOVERS),
    );
    tables.insert(
        "energy_sources_filing".to_string(),
        Table::from_pairs("abbr", "source", constants::ENERGY_SOURCES),
    );
    tables.insert(
        "transport_modes_filing".to_string(),
        Table::from_pairs("abbr", "mode", constants::TRANSPORT_MODES),
    );

    writer
        .dict_dump(&tables, "Static Generator Tables", pkg_dir)
        .await?;
    Ok(tables.keys().cloned().collect())
}

pub async fn load_static_finance(writer: &dyn TableWriter, pkg_dir: &Path) -> Result<Vec<String>> {
    let mut tables = TableMap::new();
    tables.insert(
        "finance_accounts".to_string(),
        Table::from_pairs("account", "description", constants::FINANCE_ACCOUNTS),
    );
    tables.insert(
        "finance_depreciation_lines".to_string(),
        Table::from_pairs("line", "description", constants::FINANCE_DEPRECIATION_LINES),
    );

    writer
        .dict_dump(&tables, "Static Finance Tables", pkg_dir)
        .await?;
    Ok(tables.keys().cloned().collect())
}

/// The region id list is the one reference constant worth a tabular
/// resource; most other reference tables use it as a foreign key.
pub async fn load_static_reference(
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    let mut tables = TableMap::new();
    tables.insert(
        "regions_entity_ref".to_string(),
        Table::from_column("region_id_ref", constants::REFERENCE_REGIONS),
    );

    writer
        .dict_dump(&tables, "Static Reference Tables", pkg_dir)
        .await?;
    Ok(tables.keys().cloned().collect())
}
