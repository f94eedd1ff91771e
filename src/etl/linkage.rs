//! Adapter for the cross-source linkage ("glue") tables joining generator
//! survey and finance filing identifiers.

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::etl::params::LinkageConfig;
use crate::etl::ports::SourceSet;
use crate::load::TableWriter;

pub async fn etl_linkage(
    config: &LinkageConfig,
    sources: &SourceSet,
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    // The validator skips a both-flags-false config, so this branch only
    // guards direct callers. The contract is an empty result, not an error
    // and not a sentinel.
    if !config.generators && !config.finance {
        info!("Not loading linkage tables.");
        return Ok(Vec::new());
    }

    let glue = sources
        .linkage
        .glue(config.generators, config.finance)
        .await?;

    writer.dict_dump(&glue, "Linkage", pkg_dir).await?;
    Ok(glue.keys().cloned().collect())
}
