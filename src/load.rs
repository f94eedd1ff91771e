//! The load side of the pipeline: ports for durable table writes plus the
//! CSV implementation used for flat-file packages.
//!
//! Two write paths exist. `dict_dump` persists a whole mapping of tables in
//! one shot and covers every dataset except hourly emissions. The emissions
//! path instead opens a scoped [`StreamLoader`] session per partition key and
//! appends one sub-chunk at a time, which bounds peak memory to a single
//! sub-chunk regardless of partition size.

use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::table::{Table, TableMap};

#[async_trait]
pub trait TableWriter: Send + Sync {
    /// Bulk one-shot write of a table mapping into the package directory.
    async fn dict_dump(&self, tables: &TableMap, label: &str, pkg_dir: &Path) -> Result<()>;

    /// Opens a scoped streaming session for incremental appends to a single
    /// table. The caller must release the session through `finish` on
    /// success or `abort` on failure; at most one session may be open per
    /// physical output table at any time.
    async fn open_stream(&self, table_name: &str, pkg_dir: &Path)
        -> Result<Box<dyn StreamLoader>>;
}

#[async_trait]
pub trait StreamLoader: Send {
    async fn add(&mut self, chunk: Table) -> Result<()>;

    /// Commits the session.
    async fn finish(&mut self) -> Result<()>;

    /// Releases the session after a failure without committing.
    async fn abort(&mut self) -> Result<()>;
}

/// Writes each table as `<pkg_dir>/data/<name>.csv`.
pub struct CsvTableWriter;

fn table_path(pkg_dir: &Path, name: &str) -> PathBuf {
    pkg_dir.join("data").join(format!("{name}.csv"))
}

impl CsvTableWriter {
    fn write_table(path: &Path, table: &Table) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&table.columns)?;
        for row in &table.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[async_trait]
impl TableWriter for CsvTableWriter {
    async fn dict_dump(&self, tables: &TableMap, label: &str, pkg_dir: &Path) -> Result<()> {
        for (name, table) in tables {
            let path = table_path(pkg_dir, name);
            Self::write_table(&path, table)?;
            debug!("Wrote {} ({} rows) to {}", name, table.len(), path.display());
        }
        info!("Loaded {} tables: {}", label, tables.len());
        Ok(())
    }

    async fn open_stream(
        &self,
        table_name: &str,
        pkg_dir: &Path,
    ) -> Result<Box<dyn StreamLoader>> {
        let path = table_path(pkg_dir, table_name);
        let writer = csv::Writer::from_path(&path)?;
        Ok(Box::new(CsvStreamLoader {
            table_name: table_name.to_string(),
            path,
            writer: Some(writer),
            wrote_header: false,
            chunks: 0,
        }))
    }
}

struct CsvStreamLoader {
    table_name: String,
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    wrote_header: bool,
    chunks: usize,
}

#[async_trait]
impl StreamLoader for CsvStreamLoader {
    async fn add(&mut self, chunk: Table) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .expect("stream loader used after release");
        // Column names come from the first sub-chunk; subsequent chunks are
        // assumed schema-compatible by the transform contract.
        if !self.wrote_header {
            writer.write_record(&chunk.columns)?;
            self.wrote_header = true;
        }
        for row in &chunk.rows {
            writer.write_record(row)?;
        }
        self.chunks += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!(
                "Committed stream for {} ({} chunks) at {}",
                self.table_name,
                self.chunks,
                self.path.display()
            );
        }
        Ok(())
    }

    async fn abort(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            // Flush what we have so the partial resource is inspectable, but
            // leave it to the caller's destructive package prep to clean up.
            let _ = writer.flush();
            warn!(
                "Aborted stream for {} after {} chunks; partial file left at {}",
                self.table_name,
                self.chunks,
                self.path.display()
            );
        }
        Ok(())
    }
}
