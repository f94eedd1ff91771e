//! Collaborator ports: the extraction and transformation capabilities each
//! dataset adapter depends on. Per-source parsing and column mapping live
//! behind these traits; the coordinator only sequences them.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::table::{Table, TableMap};

/// Raw tabular data as extracted from one source, keyed by source frame name.
pub type RawTables = BTreeMap<String, Table>;

/// A whole-dataset source with one reporting form: extract raw frames for
/// the requested years, then transform them into normalized output tables.
#[async_trait]
pub trait FormSource: Send + Sync {
    async fn extract(&self, years: &[i32]) -> Result<RawTables>;
    async fn transform(&self, raw: RawTables, tables: &[String]) -> Result<TableMap>;
}

/// Output of the cross-form harmonization pass: derived entity tables plus
/// the harmonized per-form tables.
#[derive(Debug, Default)]
pub struct Harmonized {
    pub entities: TableMap,
    pub tables: TableMap,
}

/// The second transform phase for the generator survey: reconciles the two
/// sub-forms and extracts entity tables. Receives both year ranges because
/// entity resolution branches on data availability by year.
#[async_trait]
pub trait Harmonizer: Send + Sync {
    async fn harmonize(
        &self,
        tables: TableMap,
        generator_years: &[i32],
        filing_years: &[i32],
    ) -> Result<Harmonized>;
}

/// The financial filing source. Extraction is table-scoped and honors the
/// `testing` flag (a reduced sample pull for CI-style runs).
#[async_trait]
pub trait FinanceSource: Send + Sync {
    async fn extract(&self, years: &[i32], tables: &[String], testing: bool) -> Result<RawTables>;
    async fn transform(&self, raw: RawTables, tables: &[String]) -> Result<TableMap>;
}

/// Identifies one transformed emissions sub-chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionsChunkKey {
    pub year: i32,
    pub month: u32,
    pub state: String,
}

/// Lazy sequence of raw emissions frames for one partition. Finite, not
/// restartable, consumed exactly once.
pub type RawEmissionsStream = Box<dyn Iterator<Item = Result<Table>> + Send>;

/// Lazy sequence of transformed sub-chunks, keyed by (year, month, state).
/// Consumers must never hold more than one item at a time.
pub type EmissionsChunkStream = Box<dyn Iterator<Item = Result<(EmissionsChunkKey, Table)>> + Send>;

/// The hourly emissions monitoring feed. Both stages are lazy: the feed is
/// far too large to materialize, so the adapter pulls one sub-chunk at a
/// time and appends it to an open writer session.
#[async_trait]
pub trait EmissionsSource: Send + Sync {
    async fn extract(&self, years: &[i32], states: &[String]) -> Result<RawEmissionsStream>;
    async fn transform(&self, raw: RawEmissionsStream) -> Result<EmissionsChunkStream>;
}

/// The auxiliary modeling-platform reference source; extraction is
/// table-scoped rather than year-scoped.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn extract(&self, tables: &[String]) -> Result<RawTables>;
    async fn transform(&self, raw: RawTables, tables: &[String]) -> Result<TableMap>;
}

/// Produces the glue tables joining generator-survey and finance identifiers.
#[async_trait]
pub trait LinkageSource: Send + Sync {
    async fn glue(&self, generators: bool, finance: bool) -> Result<TableMap>;
}

/// One bundle of every collaborator the coordinator needs.
pub struct SourceSet {
    pub generator_form: Box<dyn FormSource>,
    pub filing_form: Box<dyn FormSource>,
    pub harmonizer: Box<dyn Harmonizer>,
    pub finance: Box<dyn FinanceSource>,
    pub emissions: Box<dyn EmissionsSource>,
    pub reference: Box<dyn ReferenceSource>,
    pub linkage: Box<dyn LinkageSource>,
}
