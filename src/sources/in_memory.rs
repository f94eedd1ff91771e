//! In-memory fixture sources and a recording writer for development and
//! testing. The fixtures produce small deterministic tables shaped like the
//! real sources so the coordinator can be exercised end to end without any
//! downloaded data.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{EtlError, Result};
use crate::etl::ports::{
    EmissionsChunkKey, EmissionsChunkStream, EmissionsSource, FinanceSource, FormSource,
    Harmonized, Harmonizer, LinkageSource, RawEmissionsStream, RawTables, ReferenceSource,
    SourceSet,
};
use crate::load::{StreamLoader, TableWriter};
use crate::table::{Table, TableMap};

/// A whole-form fixture: one raw frame with a row per requested year, fanned
/// out to every requested output table by the transform step.
pub struct FixtureFormSource;

#[async_trait]
impl FormSource for FixtureFormSource {
    async fn extract(&self, years: &[i32]) -> Result<RawTables> {
        let mut frame = Table::new(vec!["report_year", "record_id"]);
        for (i, year) in years.iter().enumerate() {
            frame.push_row(vec![year.to_string(), format!("r{i}")]);
        }
        let mut raw = RawTables::new();
        raw.insert("raw_form".to_string(), frame);
        Ok(raw)
    }

    async fn transform(&self, raw: RawTables, tables: &[String]) -> Result<TableMap> {
        let base = raw
            .get("raw_form")
            .cloned()
            .unwrap_or_else(|| Table::new(vec!["report_year", "record_id"]));
        Ok(tables
            .iter()
            .map(|name| (name.clone(), base.clone()))
            .collect())
    }
}

/// Emits the derived entity tables and passes the per-form tables through.
pub struct FixtureHarmonizer;

#[async_trait]
impl Harmonizer for FixtureHarmonizer {
    async fn harmonize(
        &self,
        tables: TableMap,
        generator_years: &[i32],
        filing_years: &[i32],
    ) -> Result<Harmonized> {
        let mut entities = TableMap::new();
        let mut entity = Table::new(vec!["entity_id"]);
        entity.push_row(vec!["1"]);
        if !generator_years.is_empty() {
            entities.insert("plants_entity".to_string(), entity.clone());
            entities.insert("generators_entity".to_string(), entity.clone());
            entities.insert("utilities_entity".to_string(), entity.clone());
        }
        // Boiler entities can only be resolved where filing data exists.
        if !filing_years.is_empty() {
            entities.insert("boilers_entity".to_string(), entity);
        }
        Ok(Harmonized { entities, tables })
    }
}

pub struct FixtureFinanceSource;

#[async_trait]
impl FinanceSource for FixtureFinanceSource {
    async fn extract(&self, years: &[i32], tables: &[String], testing: bool) -> Result<RawTables> {
        debug!("Fixture finance extract: testing={testing}, {} tables", tables.len());
        let mut frame = Table::new(vec!["report_year", "respondent_id"]);
        for year in years {
            frame.push_row(vec![year.to_string(), "145".to_string()]);
        }
        let mut raw = RawTables::new();
        raw.insert("raw_filing".to_string(), frame);
        Ok(raw)
    }

    async fn transform(&self, raw: RawTables, tables: &[String]) -> Result<TableMap> {
        let base = raw
            .get("raw_filing")
            .cloned()
            .unwrap_or_else(|| Table::new(vec!["report_year", "respondent_id"]));
        Ok(tables
            .iter()
            .map(|name| (name.clone(), base.clone()))
            .collect())
    }
}

/// Streaming emissions fixture: one raw frame per (year, state), split into
/// monthly sub-chunks by the transform. `fail_on_chunk` injects a mid-stream
/// transform failure for resource-release tests.
pub struct FixtureEmissionsSource {
    pub fail_on_chunk: Option<usize>,
}

const EMISSIONS_COLUMNS: [&str; 5] = ["year", "month", "state", "plant_id", "so2_kg"];
const FIXTURE_MONTHS: u32 = 3;

#[async_trait]
impl EmissionsSource for FixtureEmissionsSource {
    async fn extract(&self, years: &[i32], states: &[String]) -> Result<RawEmissionsStream> {
        let pairs: Vec<(i32, String)> = years
            .iter()
            .flat_map(|year| states.iter().map(move |state| (*year, state.clone())))
            .collect();
        let iter = pairs.into_iter().map(|(year, state)| {
            let mut frame = Table::new(EMISSIONS_COLUMNS.to_vec());
            for month in 1..=FIXTURE_MONTHS {
                frame.push_row(vec![
                    year.to_string(),
                    month.to_string(),
                    state.clone(),
                    "54".to_string(),
                    format!("{month}.5"),
                ]);
            }
            Ok(frame)
        });
        Ok(Box::new(iter))
    }

    async fn transform(&self, raw: RawEmissionsStream) -> Result<EmissionsChunkStream> {
        let fail_on = self.fail_on_chunk;
        let iter = raw
            .flat_map(split_frame_by_month)
            .enumerate()
            .map(move |(index, item)| {
                if Some(index) == fail_on {
                    Err(EtlError::Runtime(
                        "emissions transform failed mid-stream".to_string(),
                    ))
                } else {
                    item
                }
            });
        Ok(Box::new(iter))
    }
}

fn split_frame_by_month(
    frame: Result<Table>,
) -> Vec<Result<(EmissionsChunkKey, Table)>> {
    let frame = match frame {
        Ok(frame) => frame,
        Err(e) => return vec![Err(e)],
    };
    let mut chunks: Vec<Result<(EmissionsChunkKey, Table)>> = Vec::new();
    let mut current: Option<(EmissionsChunkKey, Table)> = None;
    for row in frame.rows {
        let key = EmissionsChunkKey {
            year: row[0].parse().unwrap_or_default(),
            month: row[1].parse().unwrap_or_default(),
            state: row[2].clone(),
        };
        match &mut current {
            Some((open_key, table)) if *open_key == key => table.rows.push(row),
            _ => {
                if let Some(done) = current.take() {
                    chunks.push(Ok(done));
                }
                let mut table = Table::new(EMISSIONS_COLUMNS.to_vec());
                table.rows.push(row);
                current = Some((key, table));
            }
        }
    }
    if let Some(done) = current {
        chunks.push(Ok(done));
    }
    chunks
}

pub struct FixtureReferenceSource;

#[async_trait]
impl ReferenceSource for FixtureReferenceSource {
    async fn extract(&self, tables: &[String]) -> Result<RawTables> {
        let mut raw = RawTables::new();
        for name in tables {
            let mut frame = Table::new(vec!["region_id_ref", "value"]);
            frame.push_row(vec!["NEWE", "1.0"]);
            frame.push_row(vec!["PNWW", "2.0"]);
            raw.insert(name.clone(), frame);
        }
        Ok(raw)
    }

    async fn transform(&self, raw: RawTables, tables: &[String]) -> Result<TableMap> {
        Ok(raw
            .into_iter()
            .filter(|(name, _)| tables.contains(name))
            .collect())
    }
}

pub struct FixtureLinkageSource;

#[async_trait]
impl LinkageSource for FixtureLinkageSource {
    async fn glue(&self, generators: bool, finance: bool) -> Result<TableMap> {
        let mut link = Table::new(vec!["plant_id_common", "source_id"]);
        link.push_row(vec!["11", "a"]);

        let mut glue = TableMap::new();
        if generators {
            glue.insert("plants_gen_link".to_string(), link.clone());
            glue.insert("utilities_gen_link".to_string(), link.clone());
        }
        if finance {
            glue.insert("plants_finance_link".to_string(), link.clone());
            glue.insert("utilities_finance_link".to_string(), link);
        }
        Ok(glue)
    }
}

/// The fixture source set used by the demo command and the tests.
pub fn fixture_sources() -> SourceSet {
    SourceSet {
        generator_form: Box::new(FixtureFormSource),
        filing_form: Box::new(FixtureFormSource),
        harmonizer: Box::new(FixtureHarmonizer),
        finance: Box::new(FixtureFinanceSource),
        emissions: Box::new(FixtureEmissionsSource { fail_on_chunk: None }),
        reference: Box::new(FixtureReferenceSource),
        linkage: Box::new(FixtureLinkageSource),
    }
}

/// Like [`fixture_sources`], but the emissions transform fails on the
/// sub-chunk at `fail_on_chunk` (zero-based).
pub fn fixture_sources_with_failing_emissions(fail_on_chunk: usize) -> SourceSet {
    SourceSet {
        emissions: Box::new(FixtureEmissionsSource {
            fail_on_chunk: Some(fail_on_chunk),
        }),
        ..fixture_sources()
    }
}

/// A writer that records every dump and streaming session instead of
/// touching the filesystem.
#[derive(Default)]
pub struct RecordingWriter {
    pub dumps: Mutex<Vec<DumpRecord>>,
    pub sessions: Arc<Mutex<Vec<SessionRecord>>>,
}

#[derive(Debug, Clone)]
pub struct DumpRecord {
    pub label: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub table_name: String,
    pub chunks: usize,
    pub finished: bool,
    pub aborted: bool,
}

#[async_trait]
impl TableWriter for RecordingWriter {
    async fn dict_dump(&self, tables: &TableMap, label: &str, _pkg_dir: &Path) -> Result<()> {
        self.dumps.lock().unwrap().push(DumpRecord {
            label: label.to_string(),
            tables: tables.keys().cloned().collect(),
        });
        Ok(())
    }

    async fn open_stream(
        &self,
        table_name: &str,
        _pkg_dir: &Path,
    ) -> Result<Box<dyn StreamLoader>> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(SessionRecord {
            table_name: table_name.to_string(),
            chunks: 0,
            finished: false,
            aborted: false,
        });
        Ok(Box::new(RecordingSession {
            sessions: Arc::clone(&self.sessions),
            index: sessions.len() - 1,
        }))
    }
}

struct RecordingSession {
    sessions: Arc<Mutex<Vec<SessionRecord>>>,
    index: usize,
}

#[async_trait]
impl StreamLoader for RecordingSession {
    async fn add(&mut self, _chunk: Table) -> Result<()> {
        self.sessions.lock().unwrap()[self.index].chunks += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.sessions.lock().unwrap()[self.index].finished = true;
        Ok(())
    }

    async fn abort(&mut self) -> Result<()> {
        self.sessions.lock().unwrap()[self.index].aborted = true;
        Ok(())
    }
}
