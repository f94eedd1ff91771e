//! Adapter for the annual financial filing form.

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::etl::params::FinanceConfig;
use crate::etl::ports::SourceSet;
use crate::etl::static_tables::load_static_finance;
use crate::load::TableWriter;

pub async fn etl_finance(
    config: &FinanceConfig,
    sources: &SourceSet,
    writer: &dyn TableWriter,
    pkg_dir: &Path,
) -> Result<Vec<String>> {
    if config.finance_years.is_empty() || config.finance_tables.is_empty() {
        info!("Not loading finance filings.");
        return Ok(Vec::new());
    }

    let static_tables = load_static_finance(writer, pkg_dir).await?;

    let raw = sources
        .finance
        .extract(
            &config.finance_years,
            &config.finance_tables,
            config.finance_testing,
        )
        .await?;
    let transformed = sources
        .finance
        .transform(raw, &config.finance_tables)
        .await?;

    writer
        .dict_dump(&transformed, "Finance Filings", pkg_dir)
        .await?;

    let mut produced: Vec<String> = transformed.keys().cloned().collect();
    produced.extend(static_tables);
    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::params::FinanceConfig;
    use crate::sources::in_memory::{fixture_sources, RecordingWriter};

    #[tokio::test]
    async fn statics_are_loaded_alongside_requested_tables() {
        let config = FinanceConfig {
            finance_years: vec![2018],
            finance_tables: vec!["fuel_finance".to_string()],
            finance_testing: true,
            debug: false,
        };
        let sources = fixture_sources();
        let writer = RecordingWriter::default();
        let produced = etl_finance(&config, &sources, &writer, Path::new("unused"))
            .await
            .unwrap();
        assert_eq!(
            produced,
            vec![
                "fuel_finance",
                "finance_accounts",
                "finance_depreciation_lines"
            ]
        );
    }
}
