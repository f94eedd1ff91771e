//! Streaming adapter for the hourly emissions monitoring feed.
//!
//! The feed is far larger than available memory, so work is split along the
//! configured partition dimension (one year or one state per key). Each
//! partition is extracted and transformed as a lazy sequence of sub-chunks
//! and appended to a single scoped writer session, which bounds the working
//! set to one sub-chunk regardless of partition size. The session is
//! released on every exit path; a mid-stream failure aborts it before the
//! error propagates.

use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::constants::EMISSIONS_TABLE;
use crate::error::Result;
use crate::etl::params::EmissionsConfig;
use crate::etl::partition::{resolve_partitions, PartitionKey};
use crate::etl::ports::SourceSet;
use crate::load::TableWriter;

/// Runs the full emissions ETL for one package, one partition at a time.
///
/// Reports the aggregate `hourly_emissions` name even though each partition
/// writes its own physically named table (`hourly_emissions_<slug>`); the
/// manifest has always carried the aggregate name and downstream consumers
/// depend on it.
pub async fn etl_emissions(
    config: &EmissionsConfig,
    sources: &SourceSet,
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    if config.emissions_years.is_empty() || config.emissions_states.is_empty() {
        // Stop here to avoid emitting extraction messages for a no-op run.
        info!("Not ingesting hourly emissions.");
        return Ok(Vec::new());
    }

    for key in resolve_partitions(config) {
        etl_emissions_partition(&key, config, sources, writer, pkg_dir).await?;
    }

    Ok(vec![EMISSIONS_TABLE.to_string()])
}

/// Extract, transform, and load exactly one partition key through a scoped
/// writer session.
async fn etl_emissions_partition(
    key: &PartitionKey,
    config: &EmissionsConfig,
    sources: &SourceSet,
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<()> {
    let (years, states) = key.scope(&config.emissions_years, &config.emissions_states);

    let raw = sources.emissions.extract(&years, &states).await?;
    let chunks = sources.emissions.transform(raw).await?;

    let table_name = format!("{}_{}", EMISSIONS_TABLE, key.slug());
    info!("Loading hourly emissions partition {key}");
    let started = Instant::now();

    let mut session = writer.open_stream(&table_name, pkg_dir).await?;
    for next in chunks {
        // Release the session before letting any mid-stream error escape,
        // so a failed run never leaks an open resource.
        let (chunk_key, table) = match next {
            Ok(chunk) => chunk,
            Err(e) => {
                release_after_failure(session.as_mut()).await;
                return Err(e);
            }
        };
        if let Err(e) = session.add(table).await {
            release_after_failure(session.as_mut()).await;
            return Err(e);
        }
        tracing::debug!(
            "Appended chunk {}-{:02} {} to {}",
            chunk_key.year,
            chunk_key.month,
            chunk_key.state,
            table_name
        );
    }
    session.finish().await?;

    info!(
        "Loading {} took {:.1}s",
        table_name,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

async fn release_after_failure(session: &mut dyn crate::load::StreamLoader) {
    if let Err(abort_err) = session.abort().await {
        warn!("Failed to release writer session after error: {abort_err}");
    }
}
