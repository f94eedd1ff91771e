//! Adapter for the auxiliary modeling-platform reference dataset.

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::etl::params::ReferenceConfig;
use crate::etl::ports::SourceSet;
use crate::etl::static_tables::load_static_reference;
use crate::load::TableWriter;

pub async fn etl_reference(
    config: &ReferenceConfig,
    sources: &SourceSet,
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    if config.reference_tables.is_empty() {
        info!("Not loading reference data.");
        return Ok(Vec::new());
    }

    // Static region ids always ship with an active reference dataset; the
    // dynamic tables key against them.
    let static_tables = load_static_reference(writer, pkg_dir).await?;

    let raw = sources.reference.extract(&config.reference_tables).await?;
    let transformed = sources
        .reference
        .transform(raw, &config.reference_tables)
        .await?;

    writer.dict_dump(&transformed, "Reference", pkg_dir).await?;

    let mut produced: Vec<String> = transformed.keys().cloned().collect();
    produced.extend(static_tables);
    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TableRegistry;
    use crate::sources::in_memory::{fixture_sources, RecordingWriter};

    #[tokio::test]
    async fn default_config_loads_statics_plus_dynamic_tables() {
        let config = crate::etl::params::validate_reference(
            &crate::settings::RawDatasetParams::default(),
            &TableRegistry::default(),
        )
        .unwrap()
        .unwrap();

        let sources = fixture_sources();
        let writer = RecordingWriter::default();
        let produced = etl_reference(&config, &sources, &writer, Path::new("unused"))
            .await
            .unwrap();

        assert!(produced.contains(&"regions_entity_ref".to_string()));
        assert!(produced.contains(&"load_curves_ref".to_string()));
    }
}
