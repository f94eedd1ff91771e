//! Adapter for the generator survey: the primary generator reporting form
//! plus its companion operations filing form, harmonized into one set of
//! output tables with derived entity tables.

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::etl::params::GeneratorsConfig;
use crate::etl::ports::SourceSet;
use crate::etl::static_tables::load_static_generators;
use crate::load::TableWriter;

pub async fn etl_generators(
    config: &GeneratorsConfig,
    sources: &SourceSet,
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    if (config.filing_tables.is_empty() || config.filing_years.is_empty())
        && (config.generator_tables.is_empty() || config.generator_years.is_empty())
    {
        info!("Not loading generator survey data.");
        return Ok(Vec::new());
    }

    let static_tables = load_static_generators(writer, pkg_dir).await?;

    // Extract both sub-forms, whole-dataset.
    let filing_raw = sources.filing_form.extract(&config.filing_years).await?;
    let generator_raw = sources
        .generator_form
        .extract(&config.generator_years)
        .await?;

    // First transform phase: per-form normalization.
    let filing_transformed = sources
        .filing_form
        .transform(filing_raw, &config.filing_tables)
        .await?;
    let generator_transformed = sources
        .generator_form
        .transform(generator_raw, &config.generator_tables)
        .await?;

    let mut combined = generator_transformed;
    combined.extend(filing_transformed);

    // Second phase: cross-form harmonization and entity extraction. The
    // year ranges go along because entity resolution branches on which
    // years each sub-form actually covers.
    let harmonized = sources
        .harmonizer
        .harmonize(combined, &config.generator_years, &config.filing_years)
        .await?;

    writer
        .dict_dump(&harmonized.entities, "Entities", pkg_dir)
        .await?;
    writer
        .dict_dump(&harmonized.tables, "Generator Survey", pkg_dir)
        .await?;

    let mut produced: Vec<String> = harmonized.tables.keys().cloned().collect();
    produced.extend(harmonized.entities.keys().cloned());
    produced.extend(static_tables);
    Ok(produced)
}
