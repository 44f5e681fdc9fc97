use std::path::{Path, PathBuf};

use duckdb::Connection;
use serde::Serialize;
use tracing::info;

use crate::batch::{batch_ranges, rows_per_batch};
use crate::reader::ChunkReader;
use crate::writer::TableWriter;
use crate::{IngestError, IngestResult};

/// Rows read from a source per chunk; bounds memory use.
pub const DEFAULT_READ_CHUNKSIZE: usize = 50_000;

/// Bound parameters allowed in one write, kept under SQLite's historical
/// limit of 999 so the same batches work against either engine.
pub const DEFAULT_MAX_SQL_VARIABLES: usize = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub read_chunksize: usize,
    pub max_sql_variables: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            read_chunksize: DEFAULT_READ_CHUNKSIZE,
            max_sql_variables: DEFAULT_MAX_SQL_VARIABLES,
        }
    }
}

impl IngestOptions {
    pub fn validate(&self) -> IngestResult<()> {
        if self.read_chunksize == 0 {
            return Err(IngestError::InvalidOptions(
                "read_chunksize must be at least 1".into(),
            ));
        }
        if self.max_sql_variables == 0 {
            return Err(IngestError::InvalidOptions(
                "max_sql_variables must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What one call to [`ingest`] wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub table: String,
    pub source: PathBuf,
    /// Columns in the source header, after normalization.
    pub columns: usize,
    pub chunks_read: usize,
    pub batches_written: usize,
    pub rows_written: usize,
}

impl IngestReport {
    /// False when the source had no data rows; the table is then left as it was.
    pub fn table_written(&self) -> bool {
        self.batches_written > 0
    }
}

/// Load every row of `source` into `table` with the default options.
pub fn ingest(source: &Path, table: &str, conn: &Connection) -> IngestResult<IngestReport> {
    ingest_with(source, table, conn, &IngestOptions::default())
}

/// Load every row of `source` into `table`.
///
/// The source is read in chunks of `read_chunksize` rows and each chunk is
/// split into batches sized so no write binds more than `max_sql_variables`
/// parameters. The first batch replaces any existing table of that name and
/// the rest append, so a rerun never duplicates rows.
pub fn ingest_with(
    source: &Path,
    table: &str,
    conn: &Connection,
    options: &IngestOptions,
) -> IngestResult<IngestReport> {
    options.validate()?;
    info!(source = %source.display(), table, "starting ingest");

    let mut writer = TableWriter::new(conn, table)?;
    let chunks = ChunkReader::from_path(source, options.read_chunksize)?;
    let columns = chunks.columns().len();
    let per_batch = rows_per_batch(options.max_sql_variables, columns);
    let mut chunks_read = 0;

    for chunk in chunks {
        let chunk = chunk?;
        chunks_read += 1;

        let types = chunk.column_types();
        for rows in batch_ranges(chunk.row_count(), per_batch) {
            writer.write_batch(&chunk, &types, rows)?;
        }
    }

    let report = IngestReport {
        table: writer.table().to_string(),
        source: source.to_path_buf(),
        columns,
        chunks_read,
        batches_written: writer.batches_written(),
        rows_written: writer.rows_written(),
    };
    info!(
        table,
        rows = report.rows_written,
        batches = report.batches_written,
        "finished ingest"
    );
    Ok(report)
}
