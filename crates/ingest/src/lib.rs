//! Chunked CSV ingestion into a single DuckDB table.
//!
//! A source file is read lazily in chunks of rows, each chunk is typed and
//! split into batches that bind at most `max_sql_variables` parameters, and
//! the batches are written in order. The first batch of an [`ingest`] call
//! replaces the table; the rest append.

mod batch;
mod column;
mod error;
mod identifiers;
mod ingest;
mod reader;
mod writer;

pub use batch::{batch_ranges, rows_per_batch, WriteMode};
pub use column::ColumnType;
pub use error::IngestError;
pub use identifiers::{
    is_csv_file_name, quote_identifier, table_name_from_file_name, validate_table_name,
};
pub use ingest::{
    ingest, ingest_with, IngestOptions, IngestReport, DEFAULT_MAX_SQL_VARIABLES,
    DEFAULT_READ_CHUNKSIZE,
};
pub use reader::{Chunk, ChunkReader};
pub use writer::TableWriter;

/// Shared result type for the ingest crate.
pub type IngestResult<T> = Result<T, IngestError>;
